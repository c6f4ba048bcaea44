//! Equal-width binning into ordinal bands

use serde::Serialize;

use super::error::StatsError;

/// Ordinal level of a three-way band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for BandLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandLevel::Low => write!(f, "Low"),
            BandLevel::Medium => write!(f, "Medium"),
            BandLevel::High => write!(f, "High"),
        }
    }
}

impl BandLevel {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(BandLevel::Low),
            1 => Some(BandLevel::Medium),
            2 => Some(BandLevel::High),
            _ => None,
        }
    }
}

/// Labels for k bands: Low/Medium/High when k == 3, otherwise "Bin 1".."Bin k".
pub fn band_labels(k: usize) -> Vec<String> {
    if k == 3 {
        (0..3)
            .filter_map(BandLevel::from_index)
            .map(|level| level.to_string())
            .collect()
    } else {
        (1..=k).map(|i| format!("Bin {}", i)).collect()
    }
}

/// Equal-width partition of a value range and the bin of each input value.
#[derive(Debug, Clone, Serialize)]
pub struct EqualWidthBins {
    /// k + 1 ascending edges
    pub edges: Vec<f64>,
    /// Bin index of each input value, in input order
    pub assignments: Vec<usize>,
}

impl EqualWidthBins {
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// (lower, upper) of each interval. The first is closed on both ends,
    /// the rest are open below and closed above.
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        self.edges.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Number of values assigned to each bin.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.bin_count()];
        for &bin in &self.assignments {
            counts[bin] += 1;
        }
        counts
    }

    /// Bin index for a value under this partition, None when out of range.
    pub fn locate(&self, value: f64) -> Option<usize> {
        let k = self.bin_count();
        if value.is_nan() || value < self.edges[0] || value > self.edges[k] {
            return None;
        }
        // first i with value <= edges[i + 1]
        let idx = self.edges[1..].partition_point(|&edge| edge < value);
        Some(idx.min(k - 1))
    }
}

/// Split the observed range of `values` into `k` equal-width intervals.
///
/// A constant input is widened by 0.1% of its magnitude (0.001 when zero)
/// on each side so that every bin has positive width.
pub fn bin_equal_width(values: &[f64], k: usize) -> Result<EqualWidthBins, StatsError> {
    if k == 0 {
        return Err(StatsError::InsufficientData {
            procedure: "Equal-width binning (bins)",
            required: 1,
            actual: 0,
        });
    }
    if values.is_empty() {
        return Err(StatsError::InsufficientData {
            procedure: "Equal-width binning",
            required: 1,
            actual: 0,
        });
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        let pad = if min != 0.0 { 0.001 * min.abs() } else { 0.001 };
        min -= pad;
        max += pad;
    }

    let width = (max - min) / k as f64;
    let mut edges: Vec<f64> = (0..=k).map(|i| min + width * i as f64).collect();
    edges[k] = max;

    let mut bins = EqualWidthBins {
        edges,
        assignments: Vec::with_capacity(values.len()),
    };
    for &v in values {
        let bin = bins.locate(v).unwrap_or(k - 1);
        bins.assignments.push(bin);
    }

    Ok(bins)
}
