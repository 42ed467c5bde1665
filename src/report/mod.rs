//! Output rendering: chart images and the optional text summary.

pub mod charts;
pub mod generator;

pub use charts::{render_bar_chart, render_heatmap};
pub use generator::{generate_json_summary, generate_markdown_summary, RunInfo};
