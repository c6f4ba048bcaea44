//! Progress indicators for the analysis steps

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::styling::{INFO, WARN};

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn bar_style(template: &str, fill: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(fill)
}

/// Spinner shown while a single blocking step (load, clean, ADF) runs
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(SPINNER_TICKS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar counting rendered charts
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(bar_style(
        "    {msg} [{bar:40.cyan/blue}] {pos}/{len} charts",
        "█▓▒░",
    ));
    pb.set_message(message.to_string());
    pb
}

/// Bar counting fitted ARIMA candidates; safe to tick from rayon workers
pub fn create_fit_bar(candidates: u64) -> ProgressBar {
    let pb = ProgressBar::new(candidates);
    pb.set_style(bar_style(
        "    Fitting ARIMA candidates [{bar:40.green/white}] {pos}/{len} ({percent}%)",
        "=>-",
    ));
    pb
}

pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish with a warning message
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("{}{}", WARN, message));
}

/// Leave an informational line above a running bar
pub fn note(pb: &ProgressBar, message: &str) {
    pb.println(format!("    {}{}", INFO, message));
}
