//! Series anomaly detectors
//!
//! Each detector looks at a time-ordered series of finite values and
//! returns the points it considers anomalous, in series order. Ordering and
//! filtering of the raw input is done once by the
//! [`AnomalyDetector`](crate::AnomalyDetector) before any detector runs.

mod percentile;
mod seasonal;
mod trend;
mod zscore;

pub use percentile::PercentileDetector;
pub use seasonal::SeasonalDetector;
pub use trend::TrendBreakDetector;
pub use zscore::ZScoreDetector;

use carbonguard_core::{DetectedAnomaly, SeriesPoint};
use serde::{Deserialize, Serialize};

/// One anomaly detection strategy
pub trait Detector {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Anomalies in `series`, which must be time-ordered and finite
    fn detect(&self, series: &[SeriesPoint]) -> Vec<DetectedAnomaly>;
}

/// How eagerly the z-score detector flags points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    High,
    #[default]
    Medium,
    Low,
}

impl Sensitivity {
    /// Standard deviations a point must exceed to be flagged
    pub const fn zscore_threshold(&self) -> f64 {
        match self {
            Sensitivity::High => 2.5,
            Sensitivity::Medium => 3.0,
            Sensitivity::Low => 3.5,
        }
    }
}
