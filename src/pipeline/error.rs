//! Error types for the statistical procedures.
//!
//! Application code wraps these in `anyhow` with file/column context; the
//! statistics modules return them directly so callers (and tests) can match
//! on the failure mode.

use thiserror::Error;

/// Errors raised by cleaning, hypothesis tests, stationarity checks and forecasting.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A column referenced by the configuration is not in the table.
    #[error("Column '{column}' not found. Available columns: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Too few usable observations for the requested procedure.
    #[error("{procedure} needs at least {required} observations, got {actual}")]
    InsufficientData {
        procedure: &'static str,
        required: usize,
        actual: usize,
    },

    /// A series has no variation, so the statistic is undefined.
    #[error("Column '{column}' has zero variance")]
    ZeroVariance { column: String },

    /// Normal equations could not be solved.
    #[error("Singular design matrix in {context}")]
    SingularMatrix { context: &'static str },

    /// A timestamp value could not be parsed.
    #[error("Unparseable timestamp '{value}' in column '{column}' at row {row}")]
    InvalidTimestamp {
        column: String,
        row: usize,
        value: String,
    },

    /// Constructing a probability distribution failed.
    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_display() {
        let err = StatsError::ColumnNotFound {
            column: "humidity".to_string(),
            available: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Column 'humidity' not found. Available columns: [\"a\", \"b\"]"
        );
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = StatsError::InsufficientData {
            procedure: "ADF test",
            required: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "ADF test needs at least 8 observations, got 3"
        );
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = StatsError::InvalidTimestamp {
            column: "last_updated".to_string(),
            row: 4,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unparseable timestamp 'yesterday' in column 'last_updated' at row 4"
        );
    }
}
