//! Console tables for individual analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    AdfResult, ArimaForecast, ChiSquareResult, CleaningReport, CorrelationMatrix, PearsonResult,
};
use crate::utils::format_p_value;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Print a table indented to line up with step output.
pub fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn decision_cell(positive: bool, yes: &str, no: &str) -> Cell {
    if positive {
        Cell::new(yes).fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(no).fg(Color::Yellow)
    }
}

/// Missing counts for columns that had any, plus the row accounting.
pub fn display_cleaning(report: &CleaningReport) {
    let with_missing: Vec<&(String, usize)> = report
        .missing_by_column
        .iter()
        .filter(|(_, n)| *n > 0)
        .collect();

    if !with_missing.is_empty() {
        let mut table = new_table(&["Column", "Missing"]);
        for (name, count) in with_missing {
            table.add_row(vec![Cell::new(name), Cell::new(count).fg(Color::Red)]);
        }
        print_indented(&table);
        println!();
    }

    let mut table = new_table(&["Rows", "Count"]);
    table.add_row(vec![Cell::new("Before cleaning"), Cell::new(report.rows_before)]);
    table.add_row(vec![
        Cell::new("Dropped (missing)"),
        Cell::new(report.dropped_missing).fg(Color::Red),
    ]);
    if report.coerced_to_missing > 0 {
        table.add_row(vec![
            Cell::new("Non-numeric values (now missing)"),
            Cell::new(report.coerced_to_missing).fg(Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Dropped (duplicate)"),
        Cell::new(report.dropped_duplicates).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("After cleaning"),
        Cell::new(report.rows_after)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    print_indented(&table);
}

pub fn display_pearson(result: &PearsonResult) {
    let mut table = new_table(&["Pearson", "Value"]);
    table.add_row(vec![
        Cell::new("Variables"),
        Cell::new(format!("{} × {}", result.x_column, result.y_column)),
    ]);
    table.add_row(vec![Cell::new("Pairs"), Cell::new(result.n)]);
    table.add_row(vec![
        Cell::new("Coefficient r"),
        Cell::new(format!("{:.4}", result.coefficient)),
    ]);
    table.add_row(vec![Cell::new("p-value"), Cell::new(format_p_value(result.p_value))]);
    table.add_row(vec![
        Cell::new(format!("Significant (α = {})", result.alpha)),
        decision_cell(result.significant, "yes", "no"),
    ]);
    print_indented(&table);
}

/// Contingency table with totals, then the test statistics.
pub fn display_chi_square(result: &ChiSquareResult) {
    let table_data = &result.table;

    let mut header = vec![format!("{} \\ {}", result.x_column, result.y_column)];
    header.extend(table_data.col_labels.iter().cloned());
    header.push("Total".to_string());
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let mut table = new_table(&header_refs);

    let row_totals = table_data.row_totals();
    for (i, row) in table_data.counts.iter().enumerate() {
        let mut cells = vec![Cell::new(&table_data.row_labels[i]).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(Cell::new));
        cells.push(Cell::new(row_totals[i]).add_attribute(Attribute::Dim));
        table.add_row(cells);
    }
    let mut totals = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
    totals.extend(table_data.col_totals().into_iter().map(Cell::new));
    totals.push(Cell::new(table_data.total()).add_attribute(Attribute::Bold));
    table.add_row(totals);
    print_indented(&table);
    println!();

    let mut stats = new_table(&["Chi-Square", "Value"]);
    stats.add_row(vec![
        Cell::new("Statistic"),
        Cell::new(format!("{:.4}", result.statistic)),
    ]);
    stats.add_row(vec![
        Cell::new("Degrees of freedom"),
        Cell::new(result.degrees_of_freedom),
    ]);
    stats.add_row(vec![Cell::new("p-value"), Cell::new(format_p_value(result.p_value))]);
    if result.yates_correction {
        stats.add_row(vec![Cell::new("Yates correction"), Cell::new("applied")]);
    }
    stats.add_row(vec![
        Cell::new(format!("Dependent (α = {})", result.alpha)),
        decision_cell(result.reject_independence, "yes", "no"),
    ]);
    print_indented(&stats);
}

pub fn display_adf(results: &[AdfResult]) {
    let mut table = new_table(&[
        "Column", "ADF stat", "p-value", "Lag", "Obs", "1%", "5%", "10%", "Stationary",
    ]);
    for result in results {
        let mut row = vec![
            Cell::new(&result.column),
            Cell::new(format!("{:.4}", result.statistic)),
            Cell::new(format_p_value(result.p_value)),
            Cell::new(result.used_lag),
            Cell::new(result.nobs),
        ];
        row.extend(
            result
                .critical_values
                .iter()
                .map(|(_, v)| Cell::new(format!("{:.3}", v))),
        );
        row.push(decision_cell(result.stationary, "yes", "no"));
        table.add_row(row);
    }
    print_indented(&table);
}

/// Model summary and the first and last few forecast steps.
pub fn display_forecast(forecast: &ArimaForecast, preview: usize) {
    let mut model = new_table(&["Model", "Value"]);
    model.add_row(vec![
        Cell::new("Order"),
        Cell::new(forecast.order.to_string()).add_attribute(Attribute::Bold),
    ]);
    if !forecast.ar_coefficients.is_empty() {
        model.add_row(vec![
            Cell::new("AR"),
            Cell::new(format_coefficients(&forecast.ar_coefficients)),
        ]);
    }
    if !forecast.ma_coefficients.is_empty() {
        model.add_row(vec![
            Cell::new("MA"),
            Cell::new(format_coefficients(&forecast.ma_coefficients)),
        ]);
    }
    if !forecast.seasonal_ar_coefficients.is_empty() {
        model.add_row(vec![
            Cell::new("Seasonal AR"),
            Cell::new(format_coefficients(&forecast.seasonal_ar_coefficients)),
        ]);
    }
    if !forecast.seasonal_ma_coefficients.is_empty() {
        model.add_row(vec![
            Cell::new("Seasonal MA"),
            Cell::new(format_coefficients(&forecast.seasonal_ma_coefficients)),
        ]);
    }
    model.add_row(vec![Cell::new("Intercept"), Cell::new(format!("{:.4}", forecast.intercept))]);
    model.add_row(vec![Cell::new("σ²"), Cell::new(format!("{:.4}", forecast.sigma2))]);
    model.add_row(vec![Cell::new("AIC"), Cell::new(format!("{:.2}", forecast.aic))]);
    model.add_row(vec![
        Cell::new("Candidates"),
        Cell::new(forecast.candidates_evaluated),
    ]);
    if forecast.fallback {
        model.add_row(vec![
            Cell::new("Fallback"),
            Cell::new("no ARMA candidate fitted").fg(Color::Yellow),
        ]);
    }
    print_indented(&model);
    println!();

    let h = forecast.point.len();
    let pct = format!("{:.0}%", forecast.confidence * 100.0);
    let lower_header = format!("Lower {}", pct);
    let upper_header = format!("Upper {}", pct);
    let mut steps = new_table(&["Step", "Forecast", lower_header.as_str(), upper_header.as_str()]);
    let shown: Vec<usize> = if h <= 2 * preview {
        (0..h).collect()
    } else {
        (0..preview).chain(h - preview..h).collect()
    };
    for (k, &i) in shown.iter().enumerate() {
        if k == preview && h > 2 * preview {
            steps.add_row(vec![Cell::new("…"), Cell::new(""), Cell::new(""), Cell::new("")]);
        }
        steps.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.3}", forecast.point[i])),
            Cell::new(format!("{:.3}", forecast.lower[i])).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.3}", forecast.upper[i])).add_attribute(Attribute::Dim),
        ]);
    }
    print_indented(&steps);
}

/// Strongest off-diagonal correlations of the matrix.
pub fn display_correlation_pairs(matrix: &CorrelationMatrix, limit: usize) {
    let pairs = matrix.strongest_pairs(limit);
    if pairs.is_empty() {
        return;
    }
    println!(
        "\n    {} {}",
        style("✧").cyan(),
        style("Strongest correlations").white().bold()
    );
    let mut table = new_table(&["Column", "Column", "r"]);
    for pair in pairs {
        let color = if pair.correlation >= 0.0 { Color::Red } else { Color::Blue };
        table.add_row(vec![
            Cell::new(pair.feature1),
            Cell::new(pair.feature2),
            Cell::new(format!("{:+.3}", pair.correlation)).fg(color),
        ]);
    }
    print_indented(&table);
}

fn format_coefficients(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join(", ")
}
