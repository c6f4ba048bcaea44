//! Pearson correlation: the pairwise hypothesis test and the full correlation matrix

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::columns::{numeric_column_names, paired_values, require_columns};
use super::error::StatsError;

/// Result of a Pearson correlation test between two columns
#[derive(Debug, Clone, Serialize)]
pub struct PearsonResult {
    pub x_column: String,
    pub y_column: String,
    /// Number of paired observations used
    pub n: usize,
    pub coefficient: f64,
    /// Two-tailed p-value under H0: no linear correlation
    pub p_value: f64,
    pub alpha: f64,
    /// True when p < alpha (independence rejected)
    pub significant: bool,
}

/// A pair of columns with their correlation, used for matrix summaries
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Square correlation matrix over a set of numeric columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Upper-triangle pairs sorted by absolute correlation, strongest first.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs: Vec<CorrelatedPair> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter_map(|(i, j)| {
                let corr = self.get(i, j);
                (!corr.is_nan()).then(|| CorrelatedPair {
                    feature1: self.columns[i].clone(),
                    feature2: self.columns[j].clone(),
                    correlation: corr,
                })
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs.truncate(limit);
        pairs
    }
}

/// Pearson correlation of two equal-length slices.
///
/// Single-pass Welford update for numerical stability. Returns None for
/// fewer than 2 points, mismatched lengths or a constant input.
pub fn pearson_coefficient(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        count += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Two-tailed p-value for a correlation coefficient over n pairs.
pub fn pearson_p_value(r: f64, n: usize) -> Result<f64, StatsError> {
    if n < 3 {
        return Err(StatsError::InsufficientData {
            procedure: "Pearson test",
            required: 3,
            actual: n,
        });
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }

    let dof = (n - 2) as f64;
    let t = r * (dof / (1.0 - r * r)).sqrt();
    let dist =
        StudentsT::new(0.0, 1.0, dof).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Test for linear correlation between two columns of the table.
pub fn pearson_test(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
    alpha: f64,
) -> Result<PearsonResult, StatsError> {
    let (xs, ys) = paired_values(df, x_column, y_column)?;
    let n = xs.len();
    if n < 3 {
        return Err(StatsError::InsufficientData {
            procedure: "Pearson test",
            required: 3,
            actual: n,
        });
    }

    let coefficient = pearson_coefficient(&xs, &ys).ok_or_else(|| {
        let constant = if pearson_coefficient(&xs, &xs).is_none() {
            x_column
        } else {
            y_column
        };
        StatsError::ZeroVariance {
            column: constant.to_string(),
        }
    })?;
    let p_value = pearson_p_value(coefficient, n)?;

    Ok(PearsonResult {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        n,
        coefficient,
        p_value,
        alpha,
        significant: p_value < alpha,
    })
}

/// Compute the Pearson correlation matrix of the given columns (all numeric
/// columns when `columns` is None).
///
/// Algorithm:
/// 1. Standardize each column: Z = (X - mean) / (std * sqrt(n))
/// 2. R = Z^T * Z
///
/// Rows with a missing value in any selected column are skipped. Constant
/// columns are kept with NaN correlations so the matrix stays aligned with
/// the column list.
pub fn correlation_matrix(
    df: &DataFrame,
    columns: Option<&[String]>,
) -> Result<CorrelationMatrix, StatsError> {
    let names: Vec<String> = match columns {
        Some(cols) => {
            require_columns(df, cols)?;
            cols.to_vec()
        }
        None => numeric_column_names(df),
    };

    let n_cols = names.len();
    let mut raw: Vec<Vec<Option<f64>>> = Vec::with_capacity(n_cols);
    for name in &names {
        let casted = df.column(name)?.cast(&DataType::Float64)?;
        raw.push(casted.f64()?.iter().collect());
    }

    let n_rows_total = df.height();
    let complete_rows: Vec<usize> = (0..n_rows_total)
        .filter(|&row| {
            raw.iter()
                .all(|col| matches!(col[row], Some(v) if v.is_finite()))
        })
        .collect();
    let n_rows = complete_rows.len();

    if n_rows < 2 {
        return Err(StatsError::InsufficientData {
            procedure: "Correlation matrix",
            required: 2,
            actual: n_rows,
        });
    }

    let standardized: Vec<Option<Vec<f64>>> = raw
        .par_iter()
        .map(|col| {
            let values: Vec<f64> = complete_rows
                .iter()
                .filter_map(|&row| col[row])
                .collect();
            let mean = values.iter().sum::<f64>() / n_rows as f64;
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            if ss <= 0.0 {
                return None;
            }
            let scale = ss.sqrt();
            Some(values.iter().map(|v| (v - mean) / scale).collect())
        })
        .collect();

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, col_data) in standardized.iter().enumerate() {
        if let Some(col_data) = col_data {
            for (row_idx, &val) in col_data.iter().enumerate() {
                z[(row_idx, col_idx)] = val;
            }
        }
    }

    let mut values = z.transpose() * &z;

    for (i, col_data) in standardized.iter().enumerate() {
        if col_data.is_none() {
            for j in 0..n_cols {
                values[(i, j)] = f64::NAN;
                values[(j, i)] = f64::NAN;
            }
        } else {
            values[(i, i)] = 1.0;
        }
    }
    for i in 0..n_cols {
        for j in 0..n_cols {
            let v = values[(i, j)];
            if !v.is_nan() {
                values[(i, j)] = v.clamp(-1.0, 1.0);
            }
        }
    }

    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}
