//! Analysis modules.
//!
//! Aggregates a review table into per-aspect statistics.

pub mod aggregator;

pub use aggregator::*;
