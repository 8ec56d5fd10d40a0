//! Z-score outliers
//!
//! Each point is compared against the mean and standard deviation of the
//! *other* points. Including the point in its own baseline would cap the
//! reachable z at `sqrt(n - 1)`, so a lone spike in a short flat series
//! could never cross the threshold.

use carbonguard_core::constants::EPSILON;
use carbonguard_core::{AnomalyType, DetectedAnomaly, SeriesPoint};

use super::{Detector, Sensitivity};
use crate::scoring::{zscore_confidence, zscore_score, zscore_severity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreDetector {
    threshold: f64,
}

impl ZScoreDetector {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self { threshold: sensitivity.zscore_threshold() }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self::new(Sensitivity::default())
    }
}

impl Detector for ZScoreDetector {
    fn name(&self) -> &'static str {
        "zscore"
    }

    fn detect(&self, series: &[SeriesPoint]) -> Vec<DetectedAnomaly> {
        let n = series.len();
        if n < 3 {
            return Vec::new();
        }

        // Centre first so the leave-one-out sums stay well conditioned
        let centre = series.iter().map(|p| p.value).sum::<f64>() / n as f64;
        let (sum, sum_sq) = series.iter().fold((0.0, 0.0), |(s, sq), p| {
            let d = p.value - centre;
            (s + d, sq + d * d)
        });
        let others = (n - 1) as f64;

        series
            .iter()
            .filter_map(|point| {
                let d = point.value - centre;
                let mean_d = (sum - d) / others;
                let variance = ((sum_sq - d * d) / others - mean_d * mean_d).max(0.0);
                let z = (d - mean_d).abs() / (variance.sqrt() + EPSILON);
                if z <= self.threshold {
                    return None;
                }
                let baseline = centre + mean_d;
                Some(DetectedAnomaly::new(
                    *point,
                    zscore_score(z, self.threshold),
                    AnomalyType::Outlier,
                    zscore_severity(z),
                    zscore_confidence(z),
                    format!(
                        "Value {:.3} is {:.1} standard deviations from the mean {:.3} of the other points",
                        point.value, z, baseline
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_series::daily;
    use carbonguard_core::{Severity, SuggestedAction};

    #[test]
    fn lone_spike_in_flat_series_is_high() {
        let found = ZScoreDetector::new(Sensitivity::High).detect(&daily(&[10.0, 10.0, 10.0, 10.0, 100.0]));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 100.0);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].anomaly_score, 1.0);
        assert_eq!(found[0].confidence, 100.0);
        assert_eq!(found[0].suggested_action, SuggestedAction::FieldInspection);
    }

    #[test]
    fn constant_series_has_no_outliers() {
        assert!(ZScoreDetector::default().detect(&daily(&[4.0; 20])).is_empty());
    }

    #[test]
    fn short_series_is_skipped() {
        assert!(ZScoreDetector::default().detect(&daily(&[1.0, 50.0])).is_empty());
    }

    #[test]
    fn sensitivity_changes_what_is_flagged() {
        // Other points: mean 10, population stddev 1; the last point sits at z = 3
        let series = daily(&[9.0, 11.0, 9.0, 11.0, 9.0, 11.0, 13.0]);
        let last = series[6].timestamp;

        let high = ZScoreDetector::new(Sensitivity::High).detect(&series);
        let low = ZScoreDetector::new(Sensitivity::Low).detect(&series);
        assert!(high.iter().any(|a| a.timestamp == last));
        assert!(low.iter().all(|a| a.timestamp != last));
    }
}
