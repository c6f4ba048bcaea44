//! Missing value counting and table cleaning

use polars::prelude::*;
use serde::Serialize;

use super::columns::require_columns;
use super::error::StatsError;

/// What the cleaning step removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_missing: usize,
    pub dropped_duplicates: usize,
    /// Per-column missing counts after coercion and before removal, sorted descending.
    pub missing_by_column: Vec<(String, usize)>,
    /// Values present in the input that failed numeric coercion
    pub coerced_to_missing: usize,
    pub coerced_columns: Vec<String>,
}

impl CleaningReport {
    pub fn total_missing(&self) -> usize {
        self.missing_by_column.iter().map(|(_, n)| n).sum()
    }
}

/// Count missing values per column, sorted by count descending.
pub fn count_missing(df: &DataFrame) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect();

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Keep only rows whose `column` equals `value`.
pub fn filter_country(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame, StatsError> {
    require_columns(df, &[column])?;
    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).cast(DataType::String).eq(lit(value)))
        .collect()?;
    Ok(filtered)
}

/// Coerce the named columns to Float64, then drop incomplete and duplicate rows.
///
/// Values that fail numeric coercion become missing and are removed with the
/// other incomplete rows, so the output never contains nulls. Duplicate
/// removal keeps the first occurrence and preserves row order.
pub fn clean_dataset<S: AsRef<str>>(
    df: &DataFrame,
    coerce_columns: &[S],
) -> Result<(DataFrame, CleaningReport), StatsError> {
    require_columns(df, coerce_columns)?;

    let rows_before = df.height();
    let nulls_before: usize = df.get_columns().iter().map(|c| c.null_count()).sum();

    let casts: Vec<Expr> = coerce_columns
        .iter()
        .map(|name| col(name.as_ref()).cast(DataType::Float64))
        .collect();

    let coerced = df.clone().lazy().with_columns(casts).collect()?;
    let missing_by_column = count_missing(&coerced);
    let nulls_after: usize = missing_by_column.iter().map(|(_, n)| n).sum();

    let complete = coerced.lazy().drop_nulls(None).collect()?;
    let rows_complete = complete.height();

    let deduplicated = complete
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    let rows_after = deduplicated.height();

    let report = CleaningReport {
        rows_before,
        rows_after,
        dropped_missing: rows_before - rows_complete,
        dropped_duplicates: rows_complete - rows_after,
        missing_by_column,
        coerced_to_missing: nulls_after.saturating_sub(nulls_before),
        coerced_columns: coerce_columns
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect(),
    };

    Ok((deduplicated, report))
}
