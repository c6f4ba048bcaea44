//! JSON export of the analysis results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::summary::AnalysisSummary;
use crate::charts::ChartArtifact;
use crate::pipeline::{
    AdfResult, ArimaForecast, ChiSquareResult, CleaningReport, CorrelatedPair, PearsonResult,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub airstat_version: String,
    pub input_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub alpha: f64,
    pub bins: usize,
    pub rows_loaded: usize,
    pub columns_loaded: usize,
    /// Seconds per pipeline step
    pub step_seconds: Vec<(String, f64)>,
}

/// Complete analysis export
#[derive(Serialize)]
pub struct AnalysisReport<'a> {
    pub metadata: ReportMetadata,
    pub cleaning: &'a CleaningReport,
    pub pearson: Option<&'a PearsonResult>,
    pub chi_square: Option<&'a ChiSquareResult>,
    pub strongest_correlations: &'a [CorrelatedPair],
    pub stationarity: &'a [AdfResult],
    pub forecast: Option<&'a ArimaForecast>,
    pub charts: &'a [ChartArtifact],
}

/// Run parameters recorded in the metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub country: Option<&'a str>,
    pub alpha: f64,
    pub bins: usize,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(
        summary: &'a AnalysisSummary,
        cleaning: &'a CleaningReport,
        strongest_correlations: &'a [CorrelatedPair],
        params: &ExportParams<'_>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                airstat_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: params.input_file.to_string(),
                country: params.country.map(|s| s.to_string()),
                alpha: params.alpha,
                bins: params.bins,
                rows_loaded: summary.rows_loaded,
                columns_loaded: summary.columns_loaded,
                step_seconds: summary
                    .step_times
                    .iter()
                    .map(|(name, d)| (name.clone(), d.as_secs_f64()))
                    .collect(),
            },
            cleaning,
            pearson: summary.pearson.as_ref(),
            chi_square: summary.chi_square.as_ref(),
            strongest_correlations,
            stationarity: &summary.stationarity,
            forecast: summary.forecast.as_ref(),
            charts: &summary.charts,
        }
    }
}

/// Serialize the report to pretty JSON and write it to `output_path`.
pub fn export_report(report: &AnalysisReport<'_>, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize analysis report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis report to {}", output_path.display()))?;

    Ok(())
}
