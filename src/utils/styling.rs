//! Terminal styling utilities for step-by-step console output

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Values shown on the configuration card
#[derive(Debug, Clone)]
pub struct ConfigCard<'a> {
    pub input: &'a Path,
    pub output_dir: &'a Path,
    pub temperature_column: &'a str,
    pub aqi_column: &'a str,
    pub country: Option<&'a str>,
    pub alpha: f64,
    pub bins: usize,
    pub horizon: usize,
    pub confidence: f64,
    pub charts: bool,
}

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     █████╗ ██╗██████╗ ███████╗████████╗ █████╗ ████████╗
    ██╔══██╗██║██╔══██╗██╔════╝╚══██╔══╝██╔══██╗╚══██╔══╝
    ███████║██║██████╔╝███████╗   ██║   ███████║   ██║
    ██╔══██║██║██╔══██╗╚════██║   ██║   ██╔══██║   ██║
    ██║  ██║██║██║  ██║███████║   ██║   ██║  ██║   ██║
    ╚═╝  ╚═╝╚═╝╚═╝  ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝   ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Weather and air quality statistics").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(card: &ConfigCard<'_>) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:   {:<38}│",
        FOLDER,
        truncate_path(card.input, 37)
    );
    println!(
        "    │  {} Charts:  {:<38}│",
        SAVE,
        if card.charts {
            truncate_path(card.output_dir, 37)
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "    │  {} Pair:    {:<38}│",
        TARGET,
        truncate_string(
            &format!("{} × {}", card.temperature_column, card.aqi_column),
            37
        )
    );
    if let Some(country) = card.country {
        println!(
            "    │  {} Country: {:<38}│",
            TARGET,
            truncate_string(country, 37)
        );
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {} Significance level: {:<27}│",
        CHART,
        style(format!("{:.3}", card.alpha)).yellow()
    );
    println!(
        "    │  {} Chi-Square bins:    {:<27}│",
        CHART,
        style(card.bins).yellow()
    );
    println!(
        "    │  {} Forecast horizon:   {:<27}│",
        CHART,
        style(format!(
            "{} steps @ {:.0}%",
            card.horizon,
            card.confidence * 100.0
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}{}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("airstat analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, extra_info: Option<&str>) {
    if let Some(info) = extra_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Format a p-value for display, switching to scientific notation when tiny
pub fn format_p_value(p: f64) -> String {
    if p.is_nan() {
        "n/a".to_string()
    } else if p > 0.0 && p < 1e-4 {
        format!("{:.3e}", p)
    } else {
        format!("{:.4}", p)
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
