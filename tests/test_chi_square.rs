//! Tests for equal-width banding and the Chi-Square independence test

use airstat::pipeline::{
    bin_equal_width, chi_square_statistic, chi_square_test, ContingencyTable, StatsError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_three_bins_partition_range() {
    let values = [12.5, 30.0, 18.2, 25.1, 12.5, 29.9, 21.0];
    let bins = bin_equal_width(&values, 3).unwrap();
    let intervals = bins.intervals();

    assert_eq!(intervals.len(), 3);
    assert_eq!(intervals[0].0, 12.5);
    assert_eq!(intervals[2].1, 30.0);
    for pair in intervals.windows(2) {
        assert_eq!(pair[0].1, pair[1].0, "intervals must be contiguous");
        assert!(pair[0].0 < pair[0].1);
    }
    assert_eq!(bins.counts().iter().sum::<usize>(), values.len());
}

#[test]
fn test_every_value_lands_in_its_interval() {
    let values: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() * 20.0).collect();
    let bins = bin_equal_width(&values, 3).unwrap();
    let intervals = bins.intervals();

    for (&v, &bin) in values.iter().zip(bins.assignments.iter()) {
        let (lo, hi) = intervals[bin];
        if bin == 0 {
            assert!(v >= lo && v <= hi);
        } else {
            assert!(v > lo && v <= hi, "{} not in ({}, {}]", v, lo, hi);
        }
    }
}

#[test]
fn test_constant_values_widened() {
    let bins = bin_equal_width(&[5.0, 5.0, 5.0], 3).unwrap();
    assert!((bins.edges[0] - 4.995).abs() < 1e-12);
    assert!((bins.edges[3] - 5.005).abs() < 1e-12);
    assert_eq!(bins.assignments, vec![1, 1, 1]);

    let zero = bin_equal_width(&[0.0, 0.0], 3).unwrap();
    assert!((zero.edges[0] + 0.001).abs() < 1e-12);
    assert!((zero.edges[3] - 0.001).abs() < 1e-12);
}

#[test]
fn test_binning_empty_is_error() {
    assert!(matches!(
        bin_equal_width(&[], 3),
        Err(StatsError::InsufficientData { .. })
    ));
}

#[test]
fn test_table_totals_match_pairs() {
    let df = create_synthetic_weather(300, 5);
    let result = chi_square_test(&df, "temperature_celsius", "air_quality_us.epa.index", 3, 0.05)
        .unwrap();

    assert_eq!(result.table.total(), 300);
    assert_eq!(result.table.row_totals().iter().sum::<usize>(), 300);
    assert_eq!(result.table.col_totals().iter().sum::<usize>(), 300);
    assert_eq!(result.table.row_labels, vec!["Low", "Medium", "High"]);
    assert_eq!(result.x_edges.len(), 4);
}

#[test]
fn test_dependent_variables_rejected() {
    let df = create_synthetic_weather(300, 5);
    let result = chi_square_test(&df, "temperature_celsius", "air_quality_us.epa.index", 3, 0.05)
        .unwrap();

    assert!(result.reject_independence, "p = {}", result.p_value);
    assert!(result.degrees_of_freedom >= 1);
}

#[test]
fn test_independent_table_statistic_zero() {
    let table = ContingencyTable {
        row_labels: vec!["Low".into(), "High".into()],
        col_labels: vec!["Low".into(), "Medium".into(), "High".into()],
        counts: vec![vec![10, 20, 30], vec![20, 40, 60]],
    };
    let (statistic, dof, expected, yates) = chi_square_statistic(&table);

    assert!(statistic.abs() < 1e-12);
    assert_eq!(dof, 2);
    assert!(!yates);
    assert!((expected[0][0] - 10.0).abs() < 1e-12);
}

#[test]
fn test_known_statistic_with_yates() {
    // 2x2 with one degree of freedom: |O - E| = 5 everywhere, corrected to 4.5
    let table = ContingencyTable {
        row_labels: vec!["a".into(), "b".into()],
        col_labels: vec!["x".into(), "y".into()],
        counts: vec![vec![15, 5], vec![5, 15]],
    };
    let (statistic, dof, _, yates) = chi_square_statistic(&table);

    assert_eq!(dof, 1);
    assert!(yates);
    let expected = 4.0 * 4.5 * 4.5 / 10.0;
    assert!((statistic - expected).abs() < 1e-12);
}

#[test]
fn test_empty_band_excluded_from_dof() {
    let table = ContingencyTable {
        row_labels: vec!["Low".into(), "Medium".into(), "High".into()],
        col_labels: vec!["Low".into(), "Medium".into(), "High".into()],
        counts: vec![vec![5, 3, 0], vec![0, 0, 0], vec![2, 6, 0]],
    };
    let (_, dof, _, yates) = chi_square_statistic(&table);

    assert_eq!(dof, 1);
    assert!(yates);
}

#[test]
fn test_single_band_gives_p_value_one() {
    let df = df! {
        "t" => [20.0f64, 20.0, 20.0, 20.0],
        "aqi" => [1.0f64, 2.0, 3.0, 1.0],
    }
    .unwrap();
    let result = chi_square_test(&df, "t", "aqi", 3, 0.05).unwrap();

    assert_eq!(result.degrees_of_freedom, 0);
    assert_eq!(result.statistic, 0.0);
    assert_eq!(result.p_value, 1.0);
    assert!(!result.reject_independence);
}
