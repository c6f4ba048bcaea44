//! Tests for series extraction and ARIMA forecasting

use airstat::pipeline::{
    extract_series, forecast_arima, select_differencing_order, ForecastConfig, StatsError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn assert_band_contains_point(forecast: &airstat::pipeline::ArimaForecast) {
    for i in 0..forecast.point.len() {
        assert!(
            forecast.lower[i] <= forecast.point[i] && forecast.point[i] <= forecast.upper[i],
            "step {} outside band",
            i
        );
    }
}

#[test]
fn test_horizon_independent_of_length() {
    let config = ForecastConfig::default();
    for n in [1usize, 5, 50, 400] {
        let series = ar1_series(n, 0.4, n as u64);
        let forecast = forecast_arima("temperature_celsius", &series, &config).unwrap();

        assert_eq!(forecast.point.len(), 365, "n = {}", n);
        assert_eq!(forecast.lower.len(), 365);
        assert_eq!(forecast.upper.len(), 365);
        assert_eq!(forecast.horizon, 365);
        assert!(forecast.point.iter().all(|v| v.is_finite()), "n = {}", n);
        assert_band_contains_point(&forecast);
    }
}

#[test]
fn test_empty_series_is_error() {
    let err = forecast_arima("t", &[], &ForecastConfig::default()).unwrap_err();
    assert!(matches!(err, StatsError::InsufficientData { actual: 0, .. }));
}

#[test]
fn test_constant_series_forecasts_constant() {
    let forecast = forecast_arima("t", &[7.0; 50], &ForecastConfig::default()).unwrap();

    assert_eq!(forecast.order.d, 0);
    assert!(forecast.point.iter().all(|v| (v - 7.0).abs() < 1e-9));
    assert!(forecast.upper.iter().all(|v| (v - 7.0).abs() < 1e-9));
}

#[test]
fn test_stationary_series_reverts_to_mean() {
    let series: Vec<f64> = ar1_series(1000, 0.6, 21).iter().map(|v| v + 15.0).collect();
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    let forecast = forecast_arima("t", &series, &ForecastConfig::default()).unwrap();

    assert_eq!(forecast.order.d, 0);
    assert!(!forecast.fallback);
    assert!((forecast.point[364] - mean).abs() < 0.1);
    assert!((forecast.intercept - mean).abs() < 1e-9);
}

#[test]
fn test_ar1_order_and_coefficient_recovered() {
    let config = ForecastConfig {
        max_q: 0,
        ..ForecastConfig::default()
    };

    let mut exact = 0;
    for seed in 0..20 {
        let series = ar1_series(2000, 0.6, seed);
        let forecast = forecast_arima("t", &series, &config).unwrap();

        assert_eq!(forecast.order.d, 0);
        assert!(forecast.order.p >= 1, "seed {} picked {}", seed, forecast.order);
        assert!((forecast.ar_coefficients[0] - 0.6).abs() < 0.1);
        assert_eq!(forecast.candidates_evaluated, 4);
        if forecast.order.p == 1 {
            exact += 1;
        }
    }
    // AIC overfits now and then, but the true order must dominate
    assert!(exact >= 10, "p = 1 chosen for {} of 20 seeds", exact);
}

#[test]
fn test_white_noise_order_does_not_depend_on_scale() {
    let config = ForecastConfig {
        max_q: 0,
        horizon: 10,
        ..ForecastConfig::default()
    };

    let mut white = 0;
    for seed in 0..20 {
        let noise = ar1_series(500, 0.0, seed);
        let orders: Vec<_> = [0.1, 20.0]
            .iter()
            .map(|scale| {
                let series: Vec<f64> = noise.iter().map(|v| v * scale).collect();
                forecast_arima("t", &series, &config).unwrap().order
            })
            .collect();

        assert_eq!(orders[0], orders[1], "seed {}", seed);
        if orders[0].p == 0 && orders[0].q == 0 {
            white += 1;
        }
    }
    assert!(white >= 10, "ARIMA(0,0,0) chosen for {} of 20 seeds", white);
}

#[test]
fn test_trend_is_differenced_and_extrapolated() {
    let noise = ar1_series(300, 0.0, 8);
    let series: Vec<f64> = noise
        .iter()
        .enumerate()
        .map(|(t, e)| 0.5 * t as f64 + e)
        .collect();
    let forecast = forecast_arima("t", &series, &ForecastConfig::default()).unwrap();

    assert_eq!(forecast.order.d, 1);
    assert!(forecast.point[364] > forecast.point[0] + 100.0);
    // Integrated models widen without bound
    let first_width = forecast.upper[0] - forecast.lower[0];
    let last_width = forecast.upper[364] - forecast.lower[364];
    assert!(last_width > first_width);
}

#[test]
fn test_band_widens_with_confidence() {
    let series = ar1_series(300, 0.5, 13);
    let narrow = forecast_arima(
        "t",
        &series,
        &ForecastConfig {
            confidence: 0.8,
            ..ForecastConfig::default()
        },
    )
    .unwrap();
    let wide = forecast_arima("t", &series, &ForecastConfig::default()).unwrap();

    let narrow_width = narrow.upper[10] - narrow.lower[10];
    let wide_width = wide.upper[10] - wide.lower[10];
    assert!(wide_width > narrow_width);
}

#[test]
fn test_seasonal_differencing() {
    let noise = ar1_series(210, 0.2, 17);
    let pattern = [0.0, 3.0, 5.0, 4.0, 1.0, -2.0, -4.0];
    let series: Vec<f64> = noise
        .iter()
        .enumerate()
        .map(|(t, e)| 20.0 + pattern[t % 7] * 3.0 + e)
        .collect();
    let config = ForecastConfig {
        seasonal_period: Some(7),
        horizon: 14,
        ..ForecastConfig::default()
    };
    let forecast = forecast_arima("t", &series, &config).unwrap();

    assert_eq!(forecast.order.seasonal_d, 1);
    let label = forecast.order.to_string();
    assert!(label.starts_with("ARIMA(") && label.ends_with("[7]"), "{}", label);
    assert!(label.contains(&format!(
        "({},1,{})",
        forecast.order.seasonal_p, forecast.order.seasonal_q
    )));
    assert_eq!(forecast.candidates_evaluated, 64);
    assert_eq!(forecast.point.len(), 14);
    // The weekly shape carries into the forecast
    let peak = forecast.point[2] - forecast.point[6];
    assert!(peak > 15.0, "peak-to-trough = {}", peak);
}

#[test]
fn test_seasonal_period_ignored_for_short_series() {
    let series = ar1_series(20, 0.2, 1);
    let config = ForecastConfig {
        seasonal_period: Some(7),
        ..ForecastConfig::default()
    };
    let forecast = forecast_arima("t", &series, &config).unwrap();

    assert_eq!(forecast.order.seasonal_d, 0);
    assert_eq!(forecast.order.period, None);
}

#[test]
fn test_seasonal_ma_term_selected() {
    // y_t = y_{t-7} + e_t - 0.5 e_{t-7}
    let e = ar1_series(700, 0.0, 9);
    let mut series = vec![10.0; 700];
    for t in 7..700 {
        series[t] = series[t - 7] + e[t] - 0.5 * e[t - 7];
    }
    let config = ForecastConfig {
        seasonal_period: Some(7),
        horizon: 21,
        ..ForecastConfig::default()
    };
    let forecast = forecast_arima("t", &series, &config).unwrap();

    assert_eq!(forecast.order.seasonal_d, 1);
    assert!(
        forecast.order.seasonal_p + forecast.order.seasonal_q >= 1,
        "picked {}",
        forecast.order
    );
    assert_eq!(
        forecast.seasonal_ma_coefficients.len(),
        forecast.order.seasonal_q
    );
    assert_eq!(
        forecast.seasonal_ar_coefficients.len(),
        forecast.order.seasonal_p
    );
    if forecast.order.seasonal_p == 0 && forecast.order.seasonal_q == 1 {
        assert!((forecast.seasonal_ma_coefficients[0] + 0.5).abs() < 0.15);
    }
    assert_band_contains_point(&forecast);
}

#[test]
fn test_huge_seasonal_period_is_ignored() {
    let series = ar1_series(100, 0.3, 6);
    for period in [usize::MAX, usize::MAX / 2 + 1] {
        let config = ForecastConfig {
            seasonal_period: Some(period),
            horizon: 5,
            ..ForecastConfig::default()
        };
        let forecast = forecast_arima("t", &series, &config).unwrap();
        assert_eq!(forecast.order.period, None);
        assert_eq!(forecast.point.len(), 5);
    }
}

#[test]
fn test_select_differencing_order() {
    assert_eq!(select_differencing_order(&ar1_series(400, 0.3, 2), 2, 0.05), 0);
    assert_eq!(select_differencing_order(&[3.0; 30], 2, 0.05), 0);
    assert_eq!(select_differencing_order(&ar1_series(400, 0.3, 2), 0, 0.05), 0);
}

#[test]
fn test_extract_series_orders_by_timestamp() {
    let df = df! {
        "last_updated" => ["2024-05-18 13:15", "2024-05-16 13:15", "2024-05-17 13:15"],
        "temperature_celsius" => [18.0f64, 16.0, 17.0],
    }
    .unwrap();

    let series = extract_series(&df, "temperature_celsius", Some("last_updated")).unwrap();
    assert_eq!(series.values, vec![16.0, 17.0, 18.0]);
    assert_eq!(series.timestamps.map(|t| t.len()), Some(3));
}

#[test]
fn test_extract_series_without_timestamp_column() {
    let df = df! { "temperature_celsius" => [3.0f64, 1.0, 2.0] }.unwrap();

    let series = extract_series(&df, "temperature_celsius", Some("last_updated")).unwrap();
    assert_eq!(series.values, vec![3.0, 1.0, 2.0]);
    assert!(series.timestamps.is_none());
    assert_eq!(series.len(), 3);
}

#[test]
fn test_extract_series_bad_timestamp() {
    let df = df! {
        "last_updated" => ["2024-05-16 13:15", "yesterday"],
        "temperature_celsius" => [16.0f64, 17.0],
    }
    .unwrap();

    let err = extract_series(&df, "temperature_celsius", Some("last_updated")).unwrap_err();
    assert!(matches!(err, StatsError::InvalidTimestamp { row: 1, .. }));
}

#[test]
fn test_synthetic_weather_end_to_end_forecast() {
    let df = create_synthetic_weather(365, 4);
    let series = extract_series(&df, "temperature_celsius", Some("last_updated")).unwrap();
    let forecast = forecast_arima(&series.name, &series.values, &ForecastConfig::default()).unwrap();

    assert_eq!(forecast.column, "temperature_celsius");
    assert_eq!(forecast.n_obs, 365);
    assert_eq!(forecast.point.len(), 365);
    assert_band_contains_point(&forecast);
}
