//! Chi-Square test of independence on equal-width bands of two numeric columns

use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::binning::{band_labels, bin_equal_width, EqualWidthBins};
use super::columns::paired_values;
use super::error::StatsError;

/// Observed counts of (row band, column band) pairs
#[derive(Debug, Clone, Serialize)]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// counts[row][col]
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    /// Cross-tabulate two aligned bin assignments.
    pub fn from_assignments(rows: &EqualWidthBins, cols: &EqualWidthBins) -> Self {
        let n_rows = rows.bin_count();
        let n_cols = cols.bin_count();
        let mut counts = vec![vec![0usize; n_cols]; n_rows];
        for (&r, &c) in rows.assignments.iter().zip(cols.assignments.iter()) {
            counts[r][c] += 1;
        }
        Self {
            row_labels: band_labels(n_rows),
            col_labels: band_labels(n_cols),
            counts,
        }
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        let n_cols = self.col_labels.len();
        (0..n_cols)
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.row_totals().iter().sum()
    }
}

/// Result of the Chi-Square independence test
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareResult {
    pub x_column: String,
    pub y_column: String,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub table: ContingencyTable,
    /// Expected counts under independence (same shape as the table)
    pub expected: Vec<Vec<f64>>,
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    /// Whether Yates' continuity correction was applied
    pub yates_correction: bool,
    pub alpha: f64,
    /// True when p < alpha
    pub reject_independence: bool,
}

/// Chi-Square statistic over a contingency table.
///
/// Empty rows and columns carry zero expected counts and are left out.
/// Returns (statistic, degrees of freedom, expected counts, yates applied).
pub fn chi_square_statistic(table: &ContingencyTable) -> (f64, usize, Vec<Vec<f64>>, bool) {
    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    let n = table.total() as f64;

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|&r| {
            col_totals
                .iter()
                .map(|&c| if n > 0.0 { r as f64 * c as f64 / n } else { 0.0 })
                .collect()
        })
        .collect();

    let live_rows = row_totals.iter().filter(|&&r| r > 0).count();
    let live_cols = col_totals.iter().filter(|&&c| c > 0).count();
    let dof = live_rows.saturating_sub(1) * live_cols.saturating_sub(1);

    if dof == 0 {
        return (0.0, 0, expected, false);
    }

    let yates = dof == 1;
    let mut statistic = 0.0;
    for (i, row) in table.counts.iter().enumerate() {
        for (j, &observed) in row.iter().enumerate() {
            let e = expected[i][j];
            if e <= 0.0 {
                continue;
            }
            let mut diff = (observed as f64 - e).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            statistic += diff * diff / e;
        }
    }

    (statistic, dof, expected, yates)
}

/// Bin both columns into `bins` equal-width bands and test their independence.
pub fn chi_square_test(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
    bins: usize,
    alpha: f64,
) -> Result<ChiSquareResult, StatsError> {
    let (xs, ys) = paired_values(df, x_column, y_column)?;
    if xs.len() < 2 {
        return Err(StatsError::InsufficientData {
            procedure: "Chi-Square test",
            required: 2,
            actual: xs.len(),
        });
    }

    let x_bins = bin_equal_width(&xs, bins)?;
    let y_bins = bin_equal_width(&ys, bins)?;
    let table = ContingencyTable::from_assignments(&x_bins, &y_bins);

    let (statistic, degrees_of_freedom, expected, yates_correction) =
        chi_square_statistic(&table);

    let p_value = if degrees_of_freedom == 0 {
        1.0
    } else {
        let dist = ChiSquared::new(degrees_of_freedom as f64)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        dist.sf(statistic)
    };

    Ok(ChiSquareResult {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        x_edges: x_bins.edges,
        y_edges: y_bins.edges,
        table,
        expected,
        statistic,
        degrees_of_freedom,
        p_value,
        yates_correction,
        alpha,
        reject_independence: p_value < alpha,
    })
}
