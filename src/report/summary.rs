//! End-of-run analysis summary

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::charts::ChartArtifact;
use crate::pipeline::{AdfResult, ArimaForecast, ChiSquareResult, PearsonResult};
use crate::utils::format_p_value;

/// Everything the run produced, collected step by step
#[derive(Debug, Default)]
pub struct AnalysisSummary {
    pub rows_loaded: usize,
    pub columns_loaded: usize,
    pub rows_after_cleaning: usize,
    pub pearson: Option<PearsonResult>,
    pub chi_square: Option<ChiSquareResult>,
    pub stationarity: Vec<AdfResult>,
    pub forecast: Option<ArimaForecast>,
    pub charts: Vec<ChartArtifact>,
    pub step_times: Vec<(String, Duration)>,
}

impl AnalysisSummary {
    pub fn new(rows_loaded: usize, columns_loaded: usize) -> Self {
        Self {
            rows_loaded,
            columns_loaded,
            ..Default::default()
        }
    }

    pub fn record_step(&mut self, name: &str, elapsed: Duration) {
        self.step_times.push((name.to_string(), elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.step_times.iter().map(|(_, d)| *d).sum()
    }

    pub fn stationary_count(&self) -> usize {
        self.stationarity.iter().filter(|r| r.stationary).count()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows loaded"),
            Cell::new(format!("{} × {} columns", self.rows_loaded, self.columns_loaded)),
        ]);

        let dropped = self.rows_loaded.saturating_sub(self.rows_after_cleaning);
        table.add_row(vec![
            Cell::new("🧹 Rows after cleaning"),
            Cell::new(self.rows_after_cleaning).fg(if dropped == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        if let Some(pearson) = &self.pearson {
            table.add_row(vec![
                Cell::new("🔗 Pearson r"),
                Cell::new(format!(
                    "{:.4} (p = {})",
                    pearson.coefficient,
                    format_p_value(pearson.p_value)
                ))
                .fg(significance_color(pearson.significant)),
            ]);
        }

        if let Some(chi) = &self.chi_square {
            table.add_row(vec![
                Cell::new("🧮 Chi-Square"),
                Cell::new(format!(
                    "{:.3} on {} df (p = {})",
                    chi.statistic,
                    chi.degrees_of_freedom,
                    format_p_value(chi.p_value)
                ))
                .fg(significance_color(chi.reject_independence)),
            ]);
        }

        if !self.stationarity.is_empty() {
            table.add_row(vec![
                Cell::new("📈 Stationary series"),
                Cell::new(format!(
                    "{} of {}",
                    self.stationary_count(),
                    self.stationarity.len()
                )),
            ]);
        }

        if let Some(forecast) = &self.forecast {
            table.add_row(vec![
                Cell::new("🔮 Forecast model"),
                Cell::new(format!("{} ({} steps)", forecast.order, forecast.horizon))
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        table.add_row(vec![
            Cell::new("🖼️  Charts written"),
            Cell::new(self.charts.len()),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Total time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64()))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.step_times.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("STEP TIMINGS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (name, elapsed) in &self.step_times {
                println!(
                    "      {} {:<28} {}",
                    style("•").dim(),
                    name,
                    style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
                );
            }
        }
    }
}

fn significance_color(significant: bool) -> Color {
    if significant {
        Color::Green
    } else {
        Color::White
    }
}
