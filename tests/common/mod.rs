//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small weather table with known quirks:
/// - one row with a missing humidity
/// - one exact duplicate of the first row
/// - one temperature stored as text that is not a number ("n/a")
pub fn create_weather_dataframe() -> DataFrame {
    df! {
        "country" => ["Kenya", "Kenya", "Peru", "Peru", "Kenya", "Peru", "Kenya", "Kenya"],
        "last_updated" => [
            "2024-05-16 13:15", "2024-05-17 13:15", "2024-05-18 13:15", "2024-05-19 13:15",
            "2024-05-20 13:15", "2024-05-21 13:15", "2024-05-16 13:15", "2024-05-22 13:15",
        ],
        "temperature_celsius" => ["21.5", "22.0", "n/a", "18.0", "25.5", "17.0", "21.5", "24.0"],
        "temperature_fahrenheit" => [70.7f64, 71.6, 64.4, 64.4, 77.9, 62.6, 70.7, 75.2],
        "humidity" => [Some(60i64), Some(55), Some(70), None, Some(40), Some(80), Some(60), Some(45)],
        "air_quality_us.epa.index" => [1i64, 2, 1, 1, 3, 1, 1, 2],
    }
    .unwrap()
}

/// Larger, complete weather table with seeded noise.
///
/// Temperature follows a mean-reverting AR(1) around 20°C; air quality rises
/// with temperature so the two are positively correlated.
pub fn create_synthetic_weather(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut temperature = Vec::with_capacity(rows);
    let mut level = 0.0;
    for _ in 0..rows {
        level = 0.3 * level + (rng.gen::<f64>() - 0.5) * 6.0;
        temperature.push(20.0 + level);
    }
    let fahrenheit: Vec<f64> = temperature.iter().map(|t| t * 1.8 + 32.0).collect();
    let humidity: Vec<f64> = (0..rows).map(|_| 30.0 + rng.gen::<f64>() * 60.0).collect();
    let wind: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 20.0).collect();
    let pressure: Vec<f64> = (0..rows).map(|_| 1000.0 + rng.gen::<f64>() * 30.0).collect();
    let pm25: Vec<f64> = temperature
        .iter()
        .map(|t| (t - 10.0) * 2.0 + rng.gen::<f64>() * 10.0)
        .collect();
    let aqi: Vec<i64> = temperature
        .iter()
        .map(|t| {
            let score = (t - 17.0) / 2.0 + rng.gen::<f64>();
            score.clamp(1.0, 6.0).round() as i64
        })
        .collect();
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let stamps: Vec<String> = (0..rows)
        .map(|i| {
            (start + chrono::Duration::days(i as i64))
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .collect();

    df! {
        "country" => vec!["Kenya"; rows],
        "last_updated" => stamps,
        "temperature_celsius" => temperature,
        "temperature_fahrenheit" => fahrenheit,
        "humidity" => humidity,
        "wind_mph" => wind,
        "pressure_mb" => pressure,
        "air_quality_PM2.5" => pm25,
        "air_quality_us.epa.index" => aqi,
    }
    .unwrap()
}

/// Seeded AR(1) series x_t = phi * x_{t-1} + e_t with uniform noise.
pub fn ar1_series(n: usize, phi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = 0.0;
    (0..n)
        .map(|_| {
            x = phi * x + (rng.gen::<f64>() - 0.5) * 2.0;
            x
        })
        .collect()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("weather.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("weather.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
