//! Box-and-whisker plot of a single numeric column

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

use super::{padded_range, ChartArtifact, ChartSettings};

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Most extreme values within 1.5 IQR of the box
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = sorted.iter().copied().find(|&v| v >= low_fence).unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < low_fence || v > high_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Render a vertical boxplot of `values` to an SVG file.
pub fn plot_boxplot(
    values: &[f64],
    column: &str,
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    let stats = box_stats(values)
        .ok_or_else(|| anyhow::anyhow!("No data to plot for boxplot of '{}'", column))?;

    let (y_min, y_max) = padded_range(values, 0.1);

    let root = SVGBackend::new(path, (settings.width / 2, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Boxplot of {}", column), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(column)
        .draw()?;

    let (left, right, center) = (0.3, 0.7, 0.5);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        BLUE.mix(0.3).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        BLUE.stroke_width(1),
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(left, stats.median), (right, stats.median)],
        RED.stroke_width(2),
    )))?;

    let whiskers = [
        vec![(center, stats.q3), (center, stats.upper_whisker)],
        vec![(center, stats.q1), (center, stats.lower_whisker)],
        vec![(0.4, stats.upper_whisker), (0.6, stats.upper_whisker)],
        vec![(0.4, stats.lower_whisker), (0.6, stats.lower_whisker)],
    ];
    chart.draw_series(
        whiskers
            .into_iter()
            .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
    )?;

    chart.draw_series(
        super::stride_sample(&stats.outliers, settings.max_points)
            .into_iter()
            .map(|v| Circle::new((center, v), 3, BLACK.mix(0.5).filled())),
    )?;

    root.present()
        .with_context(|| format!("Failed to write boxplot: {}", path.display()))?;

    Ok(ChartArtifact::new("boxplot", path))
}
