//! Descriptive statistics and score clamping
//!
//! Shared by the sensor aggregator, the satellite analyzer and the anomaly
//! detectors. Empty input never panics: statistics come back zeroed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary statistics over a numeric series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median (average of the middle pair for even counts)
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl SeriesStats {
    /// Compute statistics, zeroed for an empty series
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count as f64;
        let std_dev = variance.sqrt();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let sorted = sorted_copy(values);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self { count, mean, median, std_dev, min, max }
    }
}

/// Mean of a series, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation, 0 for an empty series
pub fn std_dev(values: &[f64]) -> f64 {
    SeriesStats::from_values(values).std_dev
}

/// Copy of `values` in ascending order (NaN sorts as equal)
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Linear-interpolated percentile (`p` in 0-100) of an ascending series
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
        }
    }
}

/// Clamp to the 0-100 score scale, mapping NaN to 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Clamp to the 0-1 scale, mapping NaN to 0
pub fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// `part / whole * 100`, 0 when `whole` is 0
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
