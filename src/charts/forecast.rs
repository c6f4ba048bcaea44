//! Forecast line chart with confidence band

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

use super::{padded_range, stride_sample, ChartArtifact, ChartSettings};
use crate::pipeline::ArimaForecast;

/// Plot the observed history followed by the point forecast and its band.
///
/// The x axis is the observation index; forecast steps continue from the
/// end of the history.
pub fn plot_forecast(
    history: &[f64],
    forecast: &ArimaForecast,
    path: &Path,
    settings: &ChartSettings,
) -> Result<ChartArtifact> {
    if history.is_empty() && forecast.point.is_empty() {
        anyhow::bail!("Nothing to plot for forecast of '{}'", forecast.column);
    }

    let n = history.len();
    let h = forecast.point.len();
    let x_max = (n + h).max(2) as f64;

    let observed: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    let observed = stride_sample(&observed, settings.max_points);

    let future: Vec<(f64, f64)> = forecast
        .point
        .iter()
        .enumerate()
        .map(|(i, &v)| ((n + i) as f64, v))
        .collect();

    let all_values: Vec<f64> = history
        .iter()
        .chain(forecast.lower.iter())
        .chain(forecast.upper.iter())
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    let (y_min, y_max) = padded_range(&all_values, 0.05);

    let root = SVGBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} forecast: {}", forecast.column, forecast.order),
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Observation")
        .y_desc(forecast.column.as_str())
        .draw()?;

    if h > 0 {
        let band: Vec<(f64, f64)> = future
            .iter()
            .zip(forecast.upper.iter())
            .map(|(&(x, _), &u)| (x, u))
            .chain(
                future
                    .iter()
                    .zip(forecast.lower.iter())
                    .rev()
                    .map(|(&(x, _), &l)| (x, l)),
            )
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(band, RED.mix(0.15).filled())))?
            .label(format!("{:.0}% interval", forecast.confidence * 100.0))
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.mix(0.15).filled()));
    }

    chart
        .draw_series(LineSeries::new(observed, &BLUE))?
        .label("Observed")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(future, &RED))?
        .label("Forecast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write forecast chart: {}", path.display()))?;

    Ok(ChartArtifact::new("forecast", path))
}
