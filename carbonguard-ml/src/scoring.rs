//! Anomaly scoring, severity mapping and ranking
//!
//! Every detector reduces a point to a raw measure (a z-score, a relative
//! change, a deviation). The functions here turn that measure into the
//! score, severity and confidence carried by a [`DetectedAnomaly`], and
//! merge the output of several detectors into one ranked list.

use std::collections::HashSet;

use carbonguard_core::constants::EPSILON;
use carbonguard_core::stats::{clamp_score, clamp_unit};
use carbonguard_core::{AnomalyType, DetectedAnomaly, Severity};
use chrono::{DateTime, Utc};

/// z above which a z-score outlier is high severity
pub const ZSCORE_HIGH: f64 = 5.0;

/// z above which a z-score outlier is medium severity
pub const ZSCORE_MEDIUM: f64 = 3.5;

/// Confidence points per standard deviation
pub const ZSCORE_CONFIDENCE_PER_SIGMA: f64 = 15.0;

/// Percentile score above which an outlier is high severity
pub const PERCENTILE_SCORE_HIGH: f64 = 0.8;

/// Percentile score above which an outlier is medium severity
pub const PERCENTILE_SCORE_MEDIUM: f64 = 0.6;

/// Seasonal deviation above which severity is high
pub const SEASONAL_DEVIATION_HIGH: f64 = 0.6;

/// Seasonal deviation above which severity is medium
pub const SEASONAL_DEVIATION_MEDIUM: f64 = 0.4;

/// `min(1, z / (2 * threshold))`: a point at the threshold scores 0.5
pub fn zscore_score(z: f64, threshold: f64) -> f64 {
    clamp_unit(z / (2.0 * threshold + EPSILON))
}

pub fn zscore_severity(z: f64) -> Severity {
    if z > ZSCORE_HIGH {
        Severity::High
    } else if z > ZSCORE_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// `min(100, 15 * z)`
pub fn zscore_confidence(z: f64) -> f64 {
    clamp_score(z * ZSCORE_CONFIDENCE_PER_SIGMA)
}

pub fn percentile_severity(score: f64) -> Severity {
    if score > PERCENTILE_SCORE_HIGH {
        Severity::High
    } else if score > PERCENTILE_SCORE_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn seasonal_severity(deviation: f64) -> Severity {
    if deviation > SEASONAL_DEVIATION_HIGH {
        Severity::High
    } else if deviation > SEASONAL_DEVIATION_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Confidence for detectors without a native one: 50 at score 0, 100 at score 1
pub fn score_confidence(score: f64) -> f64 {
    clamp_score(50.0 + 50.0 * clamp_unit(score))
}

/// `(to - from) / |from|`, guarded against a zero reference
pub fn relative_change(from: f64, to: f64) -> f64 {
    (to - from) / (from.abs() + EPSILON)
}

/// Sort descending by anomaly score and keep the first record per
/// `(timestamp, type)`.
///
/// The sort is stable, so equal scores keep detector order.
pub fn rank_and_dedup(mut anomalies: Vec<DetectedAnomaly>) -> Vec<DetectedAnomaly> {
    anomalies.sort_by(|a, b| b.anomaly_score.total_cmp(&a.anomaly_score));

    let mut seen: HashSet<(DateTime<Utc>, AnomalyType)> = HashSet::with_capacity(anomalies.len());
    anomalies.retain(|a| seen.insert((a.timestamp, a.anomaly_type)));
    anomalies
}
