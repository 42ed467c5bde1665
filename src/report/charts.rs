//! PNG chart rendering.
//!
//! Draws the per-aspect bar chart and the statistics correlation heatmap
//! with plotters' bitmap backend. Existing files are overwritten.

use crate::config::ChartConfig;
use crate::models::{Aspect, CorrelationMatrix};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

pub const BAR_CHART_TITLE: &str = "Average Rating by Aspect";
pub const HEATMAP_TITLE: &str = "Correlation between Aspects and Rating Statistics";

const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const MISSING_COLOR: RGBColor = RGBColor(235, 235, 235);

// Endpoints of the blue-white-red diverging scale.
const COLD: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const HOT: RGBColor = RGBColor(180, 4, 38);

/// Map a coefficient in [-1, 1] onto the diverging scale.
///
/// Values outside the range are clamped. NaN maps to a light gray.
pub fn diverging_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING_COLOR;
    }

    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (NEUTRAL, COLD, -v)
    } else {
        (NEUTRAL, HOT, v)
    };

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Format a coefficient for a heatmap cell.
pub fn format_coefficient(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn text_style(config: &ChartConfig, size: f64) -> TextStyle<'_> {
    TextStyle::from(FontDesc::new(
        FontFamily::from(config.font_family.as_str()),
        size,
        FontStyle::Normal,
    ))
}

/// Render one bar per aspect, height = mean rating.
pub fn render_bar_chart(
    averages: &[(Aspect, f64)],
    path: &Path,
    config: &ChartConfig,
) -> Result<()> {
    let root = BitMapBackend::new(path, (config.bar_width, config.bar_height)).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = averages.len().max(1) as f64;
    let top = averages
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if top > 0.0 { top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(BAR_CHART_TITLE, text_style(config, 26.0))
        .margin(20)
        .x_label_area_size(150)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..slots, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .x_desc("Aspect of Restaurant")
        .y_desc("Average Rating")
        .axis_desc_style(text_style(config, 16.0))
        .draw()?;

    chart.draw_series(averages.iter().enumerate().map(|(i, (_, value))| {
        let x = i as f64;
        Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *value)], BAR_COLOR.filled())
    }))?;

    let value_style = text_style(config, 13.0).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(averages.iter().enumerate().map(|(i, (_, value))| {
        Text::new(
            format!("{:.2}", value),
            (i as f64 + 0.5, *value),
            value_style.clone(),
        )
    }))?;

    // Category labels sit under each bar, rotated so long labels fit.
    let label_style = TextStyle::from(
        FontDesc::new(
            FontFamily::from(config.font_family.as_str()),
            14.0,
            FontStyle::Normal,
        )
        .transform(FontTransform::Rotate90),
    )
    .pos(Pos::new(HPos::Left, VPos::Center));

    for (i, (aspect, _)) in averages.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        root.draw(&Text::new(aspect.label(), (x, y + 10), label_style.clone()))?;
    }

    root.present()?;
    debug!("Bar chart with {} bars written to {}", averages.len(), path.display());
    Ok(())
}

/// Render the correlation matrix as an annotated heatmap with a color bar.
pub fn render_heatmap(matrix: &CorrelationMatrix, path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(path, (config.heatmap_width, config.heatmap_height))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(HEATMAP_TITLE, text_style(config, 22.0))?;

    let (width, _) = root.dim_in_pixel();
    let (grid_area, legend_area) = root.split_horizontally((width * 4 / 5) as i32);

    draw_cells(&grid_area, matrix, config)?;
    draw_color_bar(&legend_area, config)?;

    root.present()?;
    debug!("Heatmap ({}x{}) written to {}", matrix.size(), matrix.size(), path.display());
    Ok(())
}

fn draw_cells<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    matrix: &CorrelationMatrix,
    config: &ChartConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    const LEFT: i32 = 90;
    const RIGHT: i32 = 10;
    const TOP: i32 = 20;
    const BOTTOM: i32 = 60;

    let n = matrix.size();
    if n == 0 {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let cell_w = ((w as i32 - LEFT - RIGHT) / n as i32).max(1);
    let cell_h = ((h as i32 - TOP - BOTTOM) / n as i32).max(1);

    let centered = text_style(config, 18.0).pos(Pos::new(HPos::Center, VPos::Center));

    for (row, values) in matrix.values.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let x0 = LEFT + col as i32 * cell_w;
            let y0 = TOP + row as i32 * cell_h;
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell_w, y0 + cell_h)],
                diverging_color(value).filled(),
            ))?;

            let ink = if value.abs() > 0.6 { &WHITE } else { &BLACK };
            area.draw(&Text::new(
                format_coefficient(value),
                (x0 + cell_w / 2, y0 + cell_h / 2),
                centered.color(ink),
            ))?;
        }
    }

    let axis_style = text_style(config, 16.0);
    for (i, label) in matrix.labels.iter().enumerate() {
        let i = i as i32;
        area.draw(&Text::new(
            label.as_str(),
            (LEFT + i * cell_w + cell_w / 2, TOP + n as i32 * cell_h + 10),
            axis_style.pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
        area.draw(&Text::new(
            label.as_str(),
            (LEFT - 10, TOP + i * cell_h + cell_h / 2),
            axis_style.pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }

    Ok(())
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    config: &ChartConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    const STEPS: i32 = 100;
    const X0: i32 = 20;
    const BAR_WIDTH: i32 = 25;
    const TOP: i32 = 20;
    const BOTTOM: i32 = 60;

    let (_, h) = area.dim_in_pixel();
    let span = (h as i32 - TOP - BOTTOM).max(STEPS);

    // Top of the bar is +1, bottom is -1.
    for step in 0..STEPS {
        let y0 = TOP + span * step / STEPS;
        let y1 = TOP + span * (step + 1) / STEPS;
        let value = 1.0 - 2.0 * (f64::from(step) + 0.5) / f64::from(STEPS);
        area.draw(&Rectangle::new(
            [(X0, y0), (X0 + BAR_WIDTH, y1)],
            diverging_color(value).filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(X0, TOP), (X0 + BAR_WIDTH, TOP + span)],
        BLACK.stroke_width(1),
    ))?;

    let tick_style = text_style(config, 13.0).pos(Pos::new(HPos::Left, VPos::Center));
    for tick in [1.0, 0.5, 0.0, -0.5, -1.0_f64] {
        let y = TOP + ((1.0 - tick) / 2.0 * f64::from(span)).round() as i32;
        area.draw(&Text::new(
            format!("{:.1}", tick),
            (X0 + BAR_WIDTH + 6, y),
            tick_style.clone(),
        ))?;
    }

    Ok(())
}
