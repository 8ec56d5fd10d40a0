//! Percentile-band outliers and sudden jumps
//!
//! Isolation-style scoring without trees: a point is unusual when it falls
//! outside the central percentile band of the series, or when it moves more
//! than a fixed ratio away from the previous point.

use carbonguard_core::constants::EPSILON;
use carbonguard_core::stats::{percentile, sorted_copy, SeriesStats};
use carbonguard_core::{AnomalyType, DetectedAnomaly, SeriesPoint};

use super::Detector;
use crate::scoring::{percentile_severity, relative_change, score_confidence};
use crate::{DEFAULT_JUMP_RATIO, DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileDetector {
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    /// Relative change from the previous point that counts as a jump
    pub jump_ratio: f64,
}

impl Default for PercentileDetector {
    fn default() -> Self {
        Self {
            lower_percentile: DEFAULT_LOWER_PERCENTILE,
            upper_percentile: DEFAULT_UPPER_PERCENTILE,
            jump_ratio: DEFAULT_JUMP_RATIO,
        }
    }
}

impl Detector for PercentileDetector {
    fn name(&self) -> &'static str {
        "percentile"
    }

    fn detect(&self, series: &[SeriesPoint]) -> Vec<DetectedAnomaly> {
        if series.len() < 2 {
            return Vec::new();
        }

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let sorted = sorted_copy(&values);
        let (Some(lower), Some(upper)) = (
            percentile(&sorted, self.lower_percentile),
            percentile(&sorted, self.upper_percentile),
        ) else {
            return Vec::new();
        };
        let stats = SeriesStats::from_values(&values);

        let mut found = Vec::new();
        for (i, point) in series.iter().enumerate() {
            let outside = point.value < lower || point.value > upper;
            let jump = if i > 0 {
                relative_change(series[i - 1].value, point.value).abs()
            } else {
                0.0
            };
            let jumped = jump > self.jump_ratio;
            if !outside && !jumped {
                continue;
            }

            let distance = (point.value - stats.mean).abs() / (3.0 * stats.std_dev + EPSILON);
            let score = distance.max(jump / 2.0).min(1.0);
            let explanation = match (outside, jumped) {
                (true, true) => format!(
                    "Value {:.3} outside [{:.3}, {:.3}] after a {:.0}% jump",
                    point.value,
                    lower,
                    upper,
                    jump * 100.0
                ),
                (true, false) => format!(
                    "Value {:.3} outside the {}-{} percentile band [{:.3}, {:.3}]",
                    point.value, self.lower_percentile, self.upper_percentile, lower, upper
                ),
                _ => format!(
                    "Value {:.3} changed {:.0}% from the previous point {:.3}",
                    point.value,
                    jump * 100.0,
                    series[i - 1].value
                ),
            };

            found.push(DetectedAnomaly::new(
                *point,
                score,
                AnomalyType::Outlier,
                percentile_severity(score),
                score_confidence(score),
                explanation,
            ));
        }
        found
    }
}
