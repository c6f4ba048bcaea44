//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use crate::utils::{create_spinner, finish_with_success};

/// Supported input formats, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Parquet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "parquet" => Ok(InputFormat::Parquet),
            _ => anyhow::bail!(
                "Unsupported file format: {}. Supported formats: csv, parquet",
                extension
            ),
        }
    }
}

/// Build a lazy scan over the input file.
///
/// `infer_schema_length` of 0 means a full-table scan for CSV type inference.
pub fn scan_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match InputFormat::from_path(path)? {
        InputFormat::Csv => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .with_has_header(true)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        InputFormat::Parquet => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
    };

    Ok(lf)
}

/// Load a dataset into memory.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    scan_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Load a dataset with a spinner, returning the frame plus (rows, columns, estimated MB).
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Reading {}...", path.display()));
    let df = load_dataset(path, infer_schema_length)?;
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {} rows", rows));
    Ok((df, rows, cols, memory_mb))
}

/// Read only the schema to list column names.
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let mut lf = scan_dataset(path, 100)?;
    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}
