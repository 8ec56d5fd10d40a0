//! Statistical Anomaly Detection for Monitoring Series
//!
//! ## Overview
//!
//! This crate finds unusual points in the numeric series produced by
//! `carbonguard-core` (vegetation index samples, sensor readings) and checks
//! whether independent sources agree on them. It also wires every core stage
//! into one [`MonitoringPipeline`].
//!
//! ## Detectors
//!
//! Four interchangeable strategies, each a [`Detector`]:
//!
//! | Detector               | Flags                                          | Type                     |
//! |------------------------|------------------------------------------------|--------------------------|
//! | [`ZScoreDetector`]     | distance from the mean beyond N stddevs        | outlier                  |
//! | [`PercentileDetector`] | points outside the 5th/95th percentiles, jumps | outlier                  |
//! | [`TrendBreakDetector`] | moving-average shifts between adjacent windows | trend break, degradation |
//! | [`SeasonalDetector`]   | deviation from the value one period earlier    | seasonal deviation       |
//!
//! An [`AnomalyModel`] picks one detector or a composite:
//!
//! ```text
//! ZScore           → z-score
//! IsolationForest  → percentile
//! Arima            → trend-break + seasonal
//! Ensemble         → all four
//! ```
//!
//! Results are merged, sorted by descending anomaly score and deduplicated
//! by `(timestamp, type)`, keeping the highest-scored record. The output is
//! a pure function of the series and the model.
//!
//! ## Corroboration
//!
//! [`corroborate`] groups anomalies reported by different sources within one
//! hour and 20% of each other. A group of two or more sources averages its
//! confidences and escalates the suggested action; a lone report survives
//! only when its own confidence is at least 60.
//!
//! ## Example
//!
//! ```rust
//! use carbonguard_core::{SeriesPoint, Severity};
//! use carbonguard_ml::{AnomalyDetector, AnomalyModel, DetectionConfig, Sensitivity};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let series: Vec<_> = [10.0, 10.0, 10.0, 10.0, 100.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| SeriesPoint::new(start + Duration::hours(i as i64), v))
//!     .collect();
//!
//! let detector = AnomalyDetector::new(DetectionConfig::with_sensitivity(Sensitivity::High))?;
//! let anomalies = detector.detect(&series, AnomalyModel::ZScore)?;
//! assert_eq!(anomalies.len(), 1);
//! assert_eq!(anomalies[0].value, 100.0);
//! assert_eq!(anomalies[0].severity, Severity::High);
//! # Ok::<(), carbonguard_ml::DetectionError>(())
//! ```

#![deny(unsafe_code)]

use carbonguard_core::MonitoringError;
use thiserror_no_std::Error;

pub mod corroboration;
pub mod detectors;
pub mod ensemble;
pub mod pipeline;
pub mod scoring;

pub use corroboration::{corroborate, CorroborationConfig, SourceReport, ValidatedAnomaly};
pub use detectors::{
    Detector, PercentileDetector, SeasonalDetector, Sensitivity, TrendBreakDetector, ZScoreDetector,
};
pub use ensemble::{detect_anomalies, AnomalyDetector, AnomalyModel, DetectionConfig};
pub use pipeline::{MonitoringPipeline, PipelineConfig, PipelineInput, PipelineReport, SensorFeed};

/// Default lower percentile of the percentile detector
pub const DEFAULT_LOWER_PERCENTILE: f64 = 5.0;

/// Default upper percentile of the percentile detector
pub const DEFAULT_UPPER_PERCENTILE: f64 = 95.0;

/// Relative point-to-point change flagged as a jump
pub const DEFAULT_JUMP_RATIO: f64 = 0.5;

/// Points in each moving-average window of the trend-break detector
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// Relative change (%) between windows that counts as a trend break
pub const DEFAULT_TREND_BREAK_PCT: f64 = 20.0;

/// Relative decline (%) between windows that counts as degradation
pub const DEFAULT_DEGRADATION_PCT: f64 = -15.0;

/// Points per seasonal cycle (monthly samples over a year)
pub const DEFAULT_SEASONAL_PERIOD: usize = 12;

/// Relative deviation from the previous cycle that is flagged
pub const DEFAULT_SEASONAL_THRESHOLD: f64 = 0.3;

/// Errors raised by detection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    /// Detector parameters that cannot produce a result
    #[error("invalid anomaly model: {reason}")]
    InvalidModel { reason: &'static str },

    #[error(transparent)]
    Monitoring(#[from] MonitoringError),
}

/// Result type for detection
pub type DetectionResult<T> = Result<T, DetectionError>;
