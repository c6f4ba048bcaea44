//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::charts::ChartSettings;
use crate::pipeline::ForecastConfig;

/// airstat - Exploratory statistics for weather and air-quality data
#[derive(Parser, Debug)]
#[command(name = "airstat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for SVG charts.
    /// Defaults to the input directory with a '_charts' suffix (e.g., weather.csv → weather_charts/).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Temperature column: Pearson/Chi-Square x variable and forecast series
    #[arg(long, default_value = "temperature_celsius")]
    pub temperature_column: String,

    /// Air quality index column: Pearson/Chi-Square y variable
    #[arg(long, default_value = "air_quality_us.epa.index")]
    pub aqi_column: String,

    /// Columns coerced to numeric before missing-value removal (comma-separated).
    /// Unparseable values become missing and the row is dropped.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "temperature_celsius,temperature_fahrenheit,humidity"
    )]
    pub coerce_columns: Vec<String>,

    /// Columns checked for stationarity with the ADF test (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "temperature_celsius,humidity")]
    pub stationarity_columns: Vec<String>,

    /// Columns rendered as histograms and boxplots (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "temperature_celsius,humidity,air_quality_PM2.5"
    )]
    pub histogram_columns: Vec<String>,

    /// Columns included in the pair plot (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "temperature_celsius,humidity,wind_mph,pressure_mb,air_quality_us.epa.index"
    )]
    pub pair_columns: Vec<String>,

    /// Timestamp column used to order the forecast series.
    /// Ignored when the column is not present in the data.
    #[arg(long, default_value = "last_updated")]
    pub timestamp_column: String,

    /// Column holding the country name (used with --country)
    #[arg(long, default_value = "country")]
    pub country_column: String,

    /// Restrict the analysis to rows from this country
    #[arg(long)]
    pub country: Option<String>,

    /// Significance level for Pearson, Chi-Square and ADF decisions (0 < alpha < 1)
    #[arg(long, default_value = "0.05", value_parser = validate_probability)]
    pub alpha: f64,

    /// Number of equal-width bands for the Chi-Square test (at least 2)
    #[arg(long, default_value = "3", value_parser = validate_bins)]
    pub bins: usize,

    /// Number of bars per histogram
    #[arg(long, default_value = "30")]
    pub histogram_bins: usize,

    /// Maximum points drawn per scatter panel (larger tables are down-sampled)
    #[arg(long, default_value = "5000")]
    pub max_points: usize,

    /// Number of forecast steps
    #[arg(long, default_value = "365")]
    pub horizon: usize,

    /// Coverage of the forecast confidence band (0 < confidence < 1)
    #[arg(long, default_value = "0.95", value_parser = validate_probability)]
    pub confidence: f64,

    /// Maximum AR order searched
    #[arg(long, default_value = "3")]
    pub max_p: usize,

    /// Maximum regular differencing order
    #[arg(long, default_value = "2")]
    pub max_d: usize,

    /// Maximum MA order searched
    #[arg(long, default_value = "3")]
    pub max_q: usize,

    /// Seasonal period (e.g. 7 or 365) enabling seasonal differencing and
    /// seasonal AR/MA terms. When omitted, the model is non-seasonal.
    #[arg(long)]
    pub seasonal_period: Option<usize>,

    /// Maximum seasonal AR order searched (with --seasonal-period)
    #[arg(long, default_value = "1")]
    pub max_seasonal_p: usize,

    /// Maximum seasonal MA order searched (with --seasonal-period)
    #[arg(long, default_value = "1")]
    pub max_seasonal_q: usize,

    /// Write every result to this JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the chart directory, deriving it from the input if not explicitly provided.
    /// The derived directory sits next to the input with a '_charts' suffix.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("airstat");
            parent.join(format!("{}_charts", stem))
        })
    }

    pub fn forecast_config(&self) -> ForecastConfig {
        ForecastConfig {
            horizon: self.horizon,
            confidence: self.confidence,
            max_p: self.max_p,
            max_d: self.max_d,
            max_q: self.max_q,
            seasonal_period: self.seasonal_period,
            max_seasonal_p: self.max_seasonal_p,
            max_seasonal_q: self.max_seasonal_q,
            alpha: self.alpha,
        }
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            histogram_bins: self.histogram_bins,
            max_points: self.max_points,
            ..ChartSettings::default()
        }
    }
}

/// Validator for probabilities that must lie strictly between 0 and 1
fn validate_probability(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("value must be between 0.0 and 1.0 (exclusive), got {}", value))
    }
}

/// Validator for the number of Chi-Square bands
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value < 2 {
        Err(format!("bins must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
