//! Scatter plot and pair plot

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::histogram::histogram_counts;
use super::{padded_range, stride_sample, ChartArtifact, ChartSettings};

/// Render `ys` against `xs` to an SVG file.
pub fn plot_scatter(
    xs: &[f64],
    ys: &[f64],
    x_label: &str,
    y_label: &str,
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    if xs.is_empty() || xs.len() != ys.len() {
        anyhow::bail!("No paired data to plot for {} vs {}", x_label, y_label);
    }

    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let points = stride_sample(&points, settings.max_points);
    let (x_min, x_max) = padded_range(xs, 0.05);
    let (y_min, y_max) = padded_range(ys, 0.05);

    let root = SVGBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} vs {}", y_label, x_label), ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.4).filled())),
    )?;

    root.present()
        .with_context(|| format!("Failed to write scatter plot: {}", path.display()))?;

    Ok(ChartArtifact::new("scatter", path))
}

fn draw_diagonal(area: &DrawingArea<SVGBackend, Shift>, values: &[f64], name: &str, bins: usize) -> Result<()> {
    let (min, width, counts) = histogram_counts(values, bins);
    let max_count = counts.iter().copied().max().unwrap_or(1) as f64;
    let (x_min, x_max) = padded_range(&[min, min + width * counts.len() as f64], 0.02);

    let mut chart = ChartBuilder::on(area)
        .caption(name, ("sans-serif", 14))
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(35)
        .build_cartesian_2d(x_min..x_max, 0.0..(max_count * 1.1))?;
    chart.configure_mesh().x_labels(4).y_labels(4).draw()?;
    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min + i as f64 * width;
        Rectangle::new([(x0, 0.0), (x0 + width, count as f64)], BLUE.mix(0.6).filled())
    }))?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend, Shift>, points: &[(f64, f64)]) -> Result<()> {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_min, x_max) = padded_range(&xs, 0.05);
    let (y_min, y_max) = padded_range(&ys, 0.05);

    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(35)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().x_labels(4).y_labels(4).draw()?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 1, BLUE.mix(0.4).filled())),
    )?;
    Ok(())
}

/// Render a k×k grid: histograms on the diagonal, scatters elsewhere.
///
/// `columns` holds row-aligned values (one entry per column).
pub fn plot_pairplot(
    columns: &[(String, Vec<f64>)],
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    let k = columns.len();
    if k == 0 || columns.iter().any(|(_, v)| v.is_empty()) {
        anyhow::bail!("No data to plot for pair plot");
    }

    let side = (220 * k as u32).max(settings.height);
    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let sampled: Vec<Vec<f64>> = columns
        .iter()
        .map(|(_, values)| stride_sample(values, settings.max_points))
        .collect();

    let areas = root.split_evenly((k, k));
    for (idx, area) in areas.iter().enumerate() {
        let (row, col) = (idx / k, idx % k);
        if row == col {
            draw_diagonal(area, &columns[row].1, &columns[row].0, settings.histogram_bins)?;
        } else {
            let points: Vec<(f64, f64)> = sampled[col]
                .iter()
                .copied()
                .zip(sampled[row].iter().copied())
                .collect();
            draw_panel(area, &points)?;
        }
    }

    root.present()
        .with_context(|| format!("Failed to write pair plot: {}", path.display()))?;

    Ok(ChartArtifact::new("pairplot", path))
}
