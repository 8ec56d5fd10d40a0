//! Trend breaks between adjacent moving-average windows
//!
//! For every position with two full windows behind it, the mean of the
//! trailing window is compared with the mean of the window before it. The
//! anomaly is reported on the last point of the trailing window.

use carbonguard_core::stats::mean;
use carbonguard_core::{AnomalyType, DetectedAnomaly, SeriesPoint, Severity};

use super::Detector;
use crate::scoring::{relative_change, score_confidence};
use crate::{DEFAULT_DEGRADATION_PCT, DEFAULT_TREND_BREAK_PCT, DEFAULT_TREND_WINDOW};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendBreakDetector {
    /// Points per window, at least 1
    pub window: usize,
    /// Absolute change (%) reported as a trend break
    pub break_pct: f64,
    /// Change (%) at or below which a decline is degradation; negative
    pub degradation_pct: f64,
}

impl Default for TrendBreakDetector {
    fn default() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
            break_pct: DEFAULT_TREND_BREAK_PCT,
            degradation_pct: DEFAULT_DEGRADATION_PCT,
        }
    }
}

impl Detector for TrendBreakDetector {
    fn name(&self) -> &'static str {
        "trend_break"
    }

    fn detect(&self, series: &[SeriesPoint]) -> Vec<DetectedAnomaly> {
        let w = self.window.max(1);
        if series.len() < 2 * w {
            return Vec::new();
        }
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();

        let mut found = Vec::new();
        for end in 2 * w..=series.len() {
            let (Some(previous), Some(current)) =
                (mean(&values[end - 2 * w..end - w]), mean(&values[end - w..end]))
            else {
                continue;
            };
            let change_pct = relative_change(previous, current) * 100.0;
            let score = (change_pct.abs() / 100.0).min(1.0);
            let point = series[end - 1];

            if change_pct.abs() > self.break_pct {
                found.push(DetectedAnomaly::new(
                    point,
                    score,
                    AnomalyType::TrendBreak,
                    Severity::Medium,
                    score_confidence(score),
                    format!(
                        "{}-point average moved {:+.1}% from {:.3} to {:.3}",
                        w, change_pct, previous, current
                    ),
                ));
            }
            if change_pct < self.degradation_pct {
                found.push(DetectedAnomaly::new(
                    point,
                    score,
                    AnomalyType::Degradation,
                    Severity::High,
                    score_confidence(score),
                    format!(
                        "{}-point average declined {:.1}% from {:.3} to {:.3}",
                        w,
                        change_pct.abs(),
                        previous,
                        current
                    ),
                ));
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_series::daily;

    #[test]
    fn step_up_is_a_trend_break_only() {
        let mut values = vec![10.0; 5];
        values.extend([13.0; 5]);
        let found = TrendBreakDetector::default().detect(&daily(&values));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].anomaly_type, AnomalyType::TrendBreak);
        assert_eq!(found[0].severity, Severity::Medium);
        assert_eq!(found[0].timestamp, daily(&values)[9].timestamp);
        assert!((found[0].anomaly_score - 0.3).abs() < 1e-6);
    }

    #[test]
    fn moderate_decline_is_degradation_only() {
        let mut values = vec![10.0; 5];
        values.extend([8.2; 5]);
        let found = TrendBreakDetector::default().detect(&daily(&values));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].anomaly_type, AnomalyType::Degradation);
        assert_eq!(found[0].severity, Severity::High);
    }

    #[test]
    fn steep_decline_tags_both() {
        let mut values = vec![10.0; 5];
        values.extend([6.0; 5]);
        let found = TrendBreakDetector::default().detect(&daily(&values));

        let kinds: Vec<_> = found.iter().map(|a| a.anomaly_type).collect();
        assert_eq!(kinds, vec![AnomalyType::TrendBreak, AnomalyType::Degradation]);
        assert!(found.iter().all(|a| (a.anomaly_score - 0.4).abs() < 1e-6));
    }

    #[test]
    fn needs_two_full_windows() {
        assert!(TrendBreakDetector::default().detect(&daily(&[1.0; 9])).is_empty());
    }
}
