//! Correlation heatmap

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

use super::{ChartArtifact, ChartSettings};
use crate::pipeline::CorrelationMatrix;

/// Diverging blue-white-red color for a correlation in [-1, 1]; NaN is grey.
pub fn correlation_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let v = value.clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - v.abs())) as u8;
    if v >= 0.0 {
        RGBColor(255, fade, fade)
    } else {
        RGBColor(fade, fade, 255)
    }
}

/// Render the correlation matrix as an annotated heatmap.
pub fn plot_correlation_heatmap(
    matrix: &CorrelationMatrix,
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    let n = matrix.len();
    if n == 0 {
        anyhow::bail!("No numeric columns for correlation heatmap");
    }

    let side = (60 * n as u32 + 250).max(settings.height);
    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let names = &matrix.columns;
    let label = |v: &i32| names.get(*v as usize).cloned().unwrap_or_default();

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(200)
        .y_label_area_size(200)
        .build_cartesian_2d(0i32..n as i32, n as i32..0i32)?;

    let cell = (side as i32 - 230) / n as i32;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_offset(cell / 2)
        .y_label_offset(cell / 2)
        .x_label_formatter(&label)
        .y_label_formatter(&label)
        .label_style(("sans-serif", 11))
        .draw()?;

    let cells: Vec<(i32, i32, f64)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (j as i32, i as i32, matrix.get(i, j)))
        .collect();

    chart.draw_series(
        cells
            .iter()
            .map(|&(x, y, v)| Rectangle::new([(x, y), (x + 1, y + 1)], correlation_color(v).filled())),
    )?;

    if n <= 20 {
        chart.draw_series(cells.iter().map(|&(x, y, v)| {
            let text = if v.is_nan() {
                "-".to_string()
            } else {
                format!("{:.2}", v)
            };
            Text::new(text, (x, y), ("sans-serif", 11).into_font())
        }))?;
    }

    root.present()
        .with_context(|| format!("Failed to write heatmap: {}", path.display()))?;

    Ok(ChartArtifact::new("heatmap", path))
}
