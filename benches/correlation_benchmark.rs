//! Benchmark comparing pairwise vs matrix-based Pearson correlation
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use airstat::pipeline::{correlation_matrix, numeric_column_names, paired_values, pearson_coefficient};

/// Weather-like synthetic columns: every fourth column tracks an earlier one
fn generate_weather_dataframe(n_rows: usize, n_columns: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_columns);

    for i in 0..n_columns {
        let values: Vec<f64> = match i % 4 {
            0 => (0..n_rows).map(|_| rng.gen::<f64>() * 40.0 - 5.0).collect(),
            1 => (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect(),
            2 => (0..n_rows)
                .map(|_| {
                    let v = rng.gen::<f64>();
                    v * v * 150.0
                })
                .collect(),
            _ => columns[i - 3]
                .iter()
                .map(|v| v * 1.8 + 32.0 + rng.gen::<f64>() * 2.0 - 1.0)
                .collect(),
        };
        columns.push(values);
    }

    let columns: Vec<Column> = columns
        .into_iter()
        .enumerate()
        .map(|(i, values)| Column::new(format!("reading_{}", i).into(), values))
        .collect();
    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Every upper-triangle pair through the two-column test path
fn pairwise_correlations(df: &DataFrame) -> Vec<f64> {
    let names = numeric_column_names(df);
    let mut out = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            let (xs, ys) = paired_values(df, &names[i], &names[j]).expect("paired values");
            out.push(pearson_coefficient(&xs, &ys).unwrap_or(f64::NAN));
        }
    }
    out
}

fn benchmark_correlation_by_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_columns");
    group.sample_size(20);

    let n_rows = 10_000;
    for n_cols in [5, 10, 25, 50] {
        let df = generate_weather_dataframe(n_rows, n_cols, 42);
        group.throughput(Throughput::Elements(((n_cols * (n_cols - 1)) / 2) as u64));

        group.bench_with_input(BenchmarkId::new("pairwise", n_cols), &df, |b, df| {
            b.iter(|| pairwise_correlations(black_box(df)));
        });

        group.bench_with_input(BenchmarkId::new("matrix", n_cols), &df, |b, df| {
            b.iter(|| correlation_matrix(black_box(df), None));
        });
    }

    group.finish();
}

fn benchmark_correlation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_rows");
    group.sample_size(20);

    let n_cols = 12;
    for n_rows in [1_000, 10_000, 50_000, 100_000] {
        let df = generate_weather_dataframe(n_rows, n_cols, 42);
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("pairwise", n_rows), &df, |b, df| {
            b.iter(|| pairwise_correlations(black_box(df)));
        });

        group.bench_with_input(BenchmarkId::new("matrix", n_rows), &df, |b, df| {
            b.iter(|| correlation_matrix(black_box(df), None));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_correlation_by_columns,
    benchmark_correlation_by_rows
);
criterion_main!(benches);
