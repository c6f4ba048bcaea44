//! Histogram of a single numeric column

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

use super::{padded_range, ChartArtifact, ChartSettings};

/// Bin `values` into `bins` equal-width buckets. Returns (min, width, counts).
pub fn histogram_counts(values: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for &value in values {
        let bin = ((value - min) / width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }
    (min, width, counts)
}

/// Render a histogram of `values` to an SVG file.
pub fn plot_histogram(
    values: &[f64],
    column: &str,
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    if values.is_empty() {
        anyhow::bail!("No data to plot for histogram of '{}'", column);
    }

    let (min, width, counts) = histogram_counts(values, settings.histogram_bins);
    let max_count = counts.iter().copied().max().unwrap_or(1) as f64;
    let x_end = min + width * counts.len() as f64;
    let (x_min, x_max) = padded_range(&[min, x_end], 0.02);

    let root = SVGBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {}", column), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..(max_count * 1.1))?;

    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min + i as f64 * width;
        let x1 = x0 + width;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.mix(0.6).filled())
    }))?;

    root.present()
        .with_context(|| format!("Failed to write histogram: {}", path.display()))?;

    Ok(ChartArtifact::new("histogram", path))
}
