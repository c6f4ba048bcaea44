//! SVG chart rendering using Plotters
//!
//! Charts are a side effect of the run: each renderer writes one file and
//! returns a [`ChartArtifact`] describing it.

pub mod boxplot;
pub mod forecast;
pub mod heatmap;
pub mod histogram;
pub mod scatter;

pub use boxplot::*;
pub use forecast::*;
pub use heatmap::*;
pub use histogram::*;
pub use scatter::*;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Shared chart dimensions and sampling limits
#[derive(Debug, Clone)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    /// Upper bound on points drawn per scatter panel
    pub max_points: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            histogram_bins: 30,
            max_points: 5000,
        }
    }
}

/// A rendered chart file
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub kind: String,
    pub path: PathBuf,
}

impl ChartArtifact {
    pub fn new(kind: &str, path: &Path) -> Self {
        Self {
            kind: kind.to_string(),
            path: path.to_path_buf(),
        }
    }
}

/// File-name-safe version of a column name.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Every `stride`-th element so that at most `max_points` remain.
pub fn stride_sample<T: Copy>(values: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 || values.len() <= max_points {
        return values.to_vec();
    }
    let stride = values.len().div_ceil(max_points);
    values.iter().step_by(stride).copied().collect()
}

/// (min, max) of the values widened by `margin` of the span; a zero span
/// is widened by 1 on each side.
pub(crate) fn padded_range(values: &[f64], margin: f64) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span == 0.0 {
        return (min - 1.0, max + 1.0);
    }
    (min - span * margin, max + span * margin)
}
