//! Deviation from the same phase of the previous cycle

use carbonguard_core::{AnomalyType, DetectedAnomaly, SeriesPoint};

use super::Detector;
use crate::scoring::{relative_change, score_confidence, seasonal_severity};
use crate::{DEFAULT_SEASONAL_PERIOD, DEFAULT_SEASONAL_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalDetector {
    /// Points per cycle, at least 1
    pub period: usize,
    /// Relative deviation above which a point is flagged
    pub threshold: f64,
}

impl Default for SeasonalDetector {
    fn default() -> Self {
        Self { period: DEFAULT_SEASONAL_PERIOD, threshold: DEFAULT_SEASONAL_THRESHOLD }
    }
}

impl Detector for SeasonalDetector {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn detect(&self, series: &[SeriesPoint]) -> Vec<DetectedAnomaly> {
        let period = self.period.max(1);
        series
            .iter()
            .enumerate()
            .skip(period)
            .filter_map(|(i, point)| {
                let reference = series[i - period].value;
                let deviation = relative_change(reference, point.value).abs();
                (deviation > self.threshold).then(|| {
                    let score = deviation.min(1.0);
                    DetectedAnomaly::new(
                        *point,
                        score,
                        AnomalyType::SeasonalDeviation,
                        seasonal_severity(deviation),
                        score_confidence(score),
                        format!(
                            "Value {:.3} deviates {:.0}% from {:.3} one cycle ({} points) earlier",
                            point.value,
                            deviation * 100.0,
                            reference,
                            period
                        ),
                    )
                })
            })
            .collect()
    }
}
