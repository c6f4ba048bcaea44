//! Column lookup and numeric extraction helpers shared by the statistical steps

use polars::prelude::*;

use super::error::StatsError;

/// Ensure every named column exists in the frame.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<(), StatsError> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for column in columns {
        let column = column.as_ref();
        if !available.iter().any(|c| c == column) {
            return Err(StatsError::ColumnNotFound {
                column: column.to_string(),
                available,
            });
        }
    }
    Ok(())
}

/// Names of all primitive numeric columns, in frame order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Cast a column to Float64 and collect its present, finite values.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, StatsError> {
    require_columns(df, &[column])?;
    let casted = df.column(column)?.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    Ok(values)
}

/// Collect row-aligned pairs where both columns hold a finite value.
pub fn paired_values(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
    require_columns(df, &[x_column, y_column])?;
    let x = df.column(x_column)?.cast(&DataType::Float64)?;
    let y = df.column(y_column)?.cast(&DataType::Float64)?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .f64()?
        .iter()
        .zip(y.f64()?.iter())
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((a, b)),
            _ => None,
        })
        .unzip();

    Ok((xs, ys))
}

/// Row-aligned values of several columns, keeping rows finite in all of them.
pub fn aligned_values<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> Result<Vec<(String, Vec<f64>)>, StatsError> {
    require_columns(df, columns)?;
    let mut raw: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let casted = df.column(name.as_ref())?.cast(&DataType::Float64)?;
        raw.push(casted.f64()?.iter().collect());
    }

    let keep: Vec<usize> = (0..df.height())
        .filter(|&row| raw.iter().all(|c| matches!(c[row], Some(v) if v.is_finite())))
        .collect();

    Ok(columns
        .iter()
        .zip(raw.iter())
        .map(|(name, values)| {
            let kept = keep.iter().filter_map(|&row| values[row]).collect();
            (name.as_ref().to_string(), kept)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_values_drops_rows_missing_anywhere() {
        let df = df! {
            "a" => [Some(1.0f64), Some(2.0), None, Some(f64::NAN)],
            "b" => [Some(5.0f64), None, Some(7.0), Some(8.0)],
        }
        .unwrap();

        let aligned = aligned_values(&df, &["a", "b"]).unwrap();
        assert_eq!(aligned[0], ("a".to_string(), vec![1.0]));
        assert_eq!(aligned[1], ("b".to_string(), vec![5.0]));
    }

    #[test]
    fn test_paired_values_skips_incomplete_rows() {
        let df = df! {
            "a" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
            "b" => [Some(10i64), Some(20), None, Some(40)],
        }
        .unwrap();

        let (xs, ys) = paired_values(&df, "a", "b").unwrap();
        assert_eq!(xs, vec![1.0, 4.0]);
        assert_eq!(ys, vec![10.0, 40.0]);
    }

    #[test]
    fn test_require_columns_reports_missing() {
        let df = df! { "a" => [1.0f64] }.unwrap();
        let err = require_columns(&df, &["a", "zzz"]).unwrap_err();
        assert!(err.to_string().contains("'zzz' not found"));
    }

    #[test]
    fn test_numeric_column_names_skips_strings() {
        let df = df! {
            "num" => [1.0f64, 2.0],
            "text" => ["x", "y"],
            "int" => [1i32, 2],
        }
        .unwrap();
        assert_eq!(numeric_column_names(&df), vec!["num", "int"]);
    }
}
