//! airstat: Weather and Air Quality Statistics CLI
//!
//! Loads a weather / air-quality table, cleans it, renders charts, tests the
//! temperature / air-quality relationship, checks stationarity and forecasts
//! temperature with an automatically selected ARIMA model.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use airstat::charts::{
    plot_boxplot, plot_correlation_heatmap, plot_forecast, plot_histogram, plot_pairplot,
    plot_scatter, sanitize_file_name, ChartArtifact, ChartSettings,
};
use airstat::cli::{confirm_run, Cli};
use airstat::pipeline::{
    aligned_values, chi_square_test, check_stationarity, clean_dataset, correlation_matrix,
    extract_series, filter_country, forecast_arima, load_dataset_with_progress, numeric_values,
    paired_values, pearson_test, CorrelatedPair,
};
use airstat::report::{
    display_adf, display_chi_square, display_cleaning, display_correlation_pairs,
    display_forecast, display_pearson, export_report, AnalysisReport, AnalysisSummary,
    ExportParams,
};
use airstat::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, note, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_dir = cli.output_dir();
    let settings = cli.chart_settings();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(&ConfigCard {
        input: &cli.input,
        output_dir: &output_dir,
        temperature_column: &cli.temperature_column,
        aqi_column: &cli.aqi_column,
        country: cli.country.as_deref(),
        alpha: cli.alpha,
        bins: cli.bins,
        horizon: cli.horizon,
        confidence: cli.confidence,
        charts: !cli.no_charts,
    });

    if !confirm_run(cli.no_confirm)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(&cli.input, cli.infer_schema_length)?;
    print_success("Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = AnalysisSummary::new(rows, cols);
    let elapsed = step_start.elapsed();
    summary.record_step("Load", elapsed);
    print_step_time(elapsed);

    // Step 2: Clean
    print_step_header(2, "Clean Data");
    let step_start = Instant::now();
    let df = match &cli.country {
        Some(country) => {
            let filtered = filter_country(&df, &cli.country_column, country)
                .with_context(|| format!("Failed to filter rows by country '{}'", country))?;
            print_info(&format!(
                "Kept {} of {} rows for {}",
                filtered.height(),
                df.height(),
                country
            ));
            filtered
        }
        None => df,
    };

    let spinner = create_spinner("Removing missing and duplicate rows...");
    let (df, cleaning) = clean_dataset(&df, &cli.coerce_columns).context("Failed to clean dataset")?;
    finish_with_success(&spinner, "Cleaning complete");

    print_count(
        "missing value(s)",
        cleaning.total_missing(),
        Some(&format!("across {} column(s)", cleaning.missing_by_column.len())),
    );
    display_cleaning(&cleaning);
    summary.rows_after_cleaning = cleaning.rows_after;
    if df.height() == 0 {
        anyhow::bail!("No rows remain after cleaning; nothing to analyse");
    }

    let elapsed = step_start.elapsed();
    summary.record_step("Clean", elapsed);
    print_step_time(elapsed);

    // Step 3: Visualize
    print_step_header(3, "Visualize");
    let step_start = Instant::now();
    let mut strongest: Vec<CorrelatedPair> = Vec::new();
    if cli.no_charts {
        print_info("Chart rendering disabled (--no-charts)");
    } else {
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create chart directory: {}", output_dir.display())
        })?;
        let (charts, pairs) = render_charts(&df, &cli, &settings, &output_dir)?;
        print_success(&format!(
            "Wrote {} chart(s) to {}",
            charts.len(),
            output_dir.display()
        ));
        summary.charts.extend(charts);
        strongest = pairs;
    }
    let elapsed = step_start.elapsed();
    summary.record_step("Visualize", elapsed);
    print_step_time(elapsed);

    // Step 4: Hypothesis tests
    print_step_header(4, "Hypothesis Tests");
    let step_start = Instant::now();
    let pearson = pearson_test(&df, &cli.temperature_column, &cli.aqi_column, cli.alpha)
        .context("Pearson correlation test failed")?;
    display_pearson(&pearson);
    println!();

    let chi_square = chi_square_test(&df, &cli.temperature_column, &cli.aqi_column, cli.bins, cli.alpha)
        .context("Chi-Square test failed")?;
    display_chi_square(&chi_square);

    summary.pearson = Some(pearson);
    summary.chi_square = Some(chi_square);
    let elapsed = step_start.elapsed();
    summary.record_step("Hypothesis tests", elapsed);
    print_step_time(elapsed);

    // Step 5: Stationarity
    print_step_header(5, "Stationarity (ADF)");
    let step_start = Instant::now();
    let spinner = create_spinner("Running Augmented Dickey-Fuller tests...");
    let adf = check_stationarity(&df, &cli.stationarity_columns, cli.alpha)
        .context("Stationarity check failed")?;
    finish_with_success(&spinner, "ADF tests complete");
    display_adf(&adf);
    for result in adf.iter().filter(|r| !r.stationary) {
        print_warning(&format!(
            "'{}' looks non-stationary (p = {:.4})",
            result.column, result.p_value
        ));
    }
    summary.stationarity = adf;
    let elapsed = step_start.elapsed();
    summary.record_step("Stationarity", elapsed);
    print_step_time(elapsed);

    // Step 6: Forecast
    print_step_header(6, "ARIMA Forecast");
    let step_start = Instant::now();
    let series = extract_series(&df, &cli.temperature_column, Some(cli.timestamp_column.as_str()))
        .context("Failed to extract forecast series")?;
    if series.timestamps.is_some() {
        print_info(&format!("Series ordered by '{}'", cli.timestamp_column));
    }
    let config = cli.forecast_config();
    let forecast = forecast_arima(&series.name, &series.values, &config)
        .context("ARIMA forecast failed")?;
    print_success(&format!(
        "Selected {} from {} candidate(s)",
        forecast.order, forecast.candidates_evaluated
    ));
    if forecast.fallback {
        print_warning("No ARMA candidate could be fitted; using a pure differencing model");
    }
    display_forecast(&forecast, 5);

    if !cli.no_charts {
        let path = output_dir.join(format!(
            "forecast_{}.svg",
            sanitize_file_name(&forecast.column)
        ));
        summary
            .charts
            .push(plot_forecast(&series.values, &forecast, &path, &settings)?);
        print_success(&format!("Forecast chart saved to {}", path.display()));
    }
    summary.forecast = Some(forecast);
    let elapsed = step_start.elapsed();
    summary.record_step("Forecast", elapsed);
    print_step_time(elapsed);

    // Display summary
    summary.display();

    if let Some(report_path) = &cli.report {
        let input_file = cli.input.display().to_string();
        let report = AnalysisReport::new(
            &summary,
            &cleaning,
            &strongest,
            &ExportParams {
                input_file: &input_file,
                country: cli.country.as_deref(),
                alpha: cli.alpha,
                bins: cli.bins,
            },
        );
        export_report(&report, report_path)?;
        println!();
        print_success(&format!("Report written to {}", report_path.display()));
    }

    // Final completion message
    print_completion();

    Ok(())
}

/// Render the distribution, relationship and correlation charts.
///
/// Columns that are missing or non-numeric are skipped with a warning.
/// Returns the written charts and the strongest correlated pairs.
fn render_charts(
    df: &DataFrame,
    cli: &Cli,
    settings: &ChartSettings,
    output_dir: &Path,
) -> Result<(Vec<ChartArtifact>, Vec<CorrelatedPair>)> {
    let mut charts = Vec::new();
    let total = cli.histogram_columns.len() * 2 + 3;
    let pb = create_progress_bar(total as u64, "Rendering charts");

    for column in &cli.histogram_columns {
        match numeric_values(df, column) {
            Ok(values) if !values.is_empty() => {
                let name = sanitize_file_name(column);
                let hist = output_dir.join(format!("hist_{}.svg", name));
                charts.push(plot_histogram(&values, column, &hist, settings)?);
                let boxplot = output_dir.join(format!("boxplot_{}.svg", name));
                charts.push(plot_boxplot(&values, column, &boxplot, settings)?);
            }
            Ok(_) => note(&pb, &format!("Skipping '{}': no numeric values", column)),
            Err(e) => note(&pb, &format!("Skipping '{}': {}", column, e)),
        }
        pb.inc(2);
    }

    let (xs, ys) = paired_values(df, &cli.temperature_column, &cli.aqi_column)?;
    let scatter = output_dir.join(format!(
        "scatter_{}_vs_{}.svg",
        sanitize_file_name(&cli.temperature_column),
        sanitize_file_name(&cli.aqi_column)
    ));
    charts.push(plot_scatter(
        &xs,
        &ys,
        &cli.temperature_column,
        &cli.aqi_column,
        &scatter,
        settings,
    )?);
    pb.inc(1);

    let present: Vec<&String> = cli
        .pair_columns
        .iter()
        .filter(|c| numeric_values(df, c).map(|v| !v.is_empty()).unwrap_or(false))
        .collect();
    if present.len() < cli.pair_columns.len() {
        note(
            &pb,
            &format!(
                "Pair plot uses {} of {} requested column(s)",
                present.len(),
                cli.pair_columns.len()
            ),
        );
    }
    if !present.is_empty() {
        let columns = aligned_values(df, &present)?;
        if columns.iter().all(|(_, v)| !v.is_empty()) {
            let path = output_dir.join("pairplot.svg");
            charts.push(plot_pairplot(&columns, &path, settings)?);
        }
    }
    pb.inc(1);

    let mut strongest = Vec::new();
    match correlation_matrix(df, None) {
        Ok(matrix) if !matrix.is_empty() => {
            let path = output_dir.join("correlation_heatmap.svg");
            charts.push(plot_correlation_heatmap(&matrix, &path, settings)?);
            strongest = matrix.strongest_pairs(10);
            pb.inc(1);
            finish_with_success(&pb, "Charts rendered");
            display_correlation_pairs(&matrix, 5);
        }
        Ok(_) => {
            pb.inc(1);
            finish_with_warning(&pb, "No numeric columns for the correlation heatmap");
        }
        Err(e) => {
            pb.inc(1);
            finish_with_warning(&pb, &format!("Correlation heatmap skipped: {}", e));
        }
    }

    Ok((charts, strongest))
}
