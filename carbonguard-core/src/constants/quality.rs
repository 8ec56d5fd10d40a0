//! Validation Scoring Thresholds
//!
//! Cut-offs used by the validation pipeline and the cross-source validator.
//! All scores are on a 0-100 scale.

// ===== DATA VALIDATION =====

/// Minimum quality score for a result to be valid.
pub const QUALITY_VALID_THRESHOLD: f64 = 70.0;

/// Minimum quality score for a valid result to be approved without review.
pub const QUALITY_APPROVE_THRESHOLD: f64 = 85.0;

/// Minimum quality score for an invalid result to ask for more data
/// instead of being rejected.
pub const QUALITY_MORE_DATA_THRESHOLD: f64 = 60.0;

// ===== SATELLITE RULES =====

/// Sample confidence (%) every satellite index sample must reach.
///
/// Inclusive: a sample at exactly this value passes. Auto-fix floors
/// confidences at this value, so fixed data must validate.
pub const MIN_INDEX_CONFIDENCE: f64 = 70.0;

/// Lower bound of plausible vegetation cover change vs. baseline (%).
pub const COVER_CHANGE_MIN_PCT: f64 = -50.0;

/// Upper bound of plausible vegetation cover change vs. baseline (%).
pub const COVER_CHANGE_MAX_PCT: f64 = 30.0;

/// Upper bound of plausible biomass (t/ha).
pub const MAX_BIOMASS_T_HA: f64 = 500.0;

/// Maximum acceptable cloud/obstruction cover (%).
pub const MAX_CLOUD_COVER_PCT: f64 = 30.0;

/// Minimum acceptable completeness (%).
pub const MIN_COMPLETENESS_PCT: f64 = 60.0;

// ===== SENSOR RULES =====

/// Mean reading confidence (%) a sensor series must exceed.
pub const MIN_SENSOR_CONFIDENCE: f64 = 50.0;

/// Maximum age of the newest reading before a warning (days).
pub const MAX_READING_AGE_DAYS: i64 = 7;

/// Maximum age of the newest reading before an info notice (hours).
pub const FRESH_READING_AGE_HOURS: i64 = 24;

// ===== CROSS-SOURCE =====

/// Starting consistency score before discrepancies are deducted.
pub const CONSISTENCY_START: f64 = 100.0;

/// Minimum consistency score for sources to count as mutually consistent.
pub const CONSISTENCY_VALID_THRESHOLD: f64 = 70.0;

/// Satellite health above which a poor sensor signal is a discrepancy.
pub const HEALTHY_SATELLITE_THRESHOLD: f64 = 70.0;

/// Factor that rescales a sensor mean onto the 0-100 health basis.
pub const SENSOR_HEALTH_SCALE: f64 = 20.0;

/// Rescaled sensor health below which the sensor signal is poor.
pub const POOR_PROXY_HEALTH: f64 = 5.0;

/// Points deducted for a health disagreement.
pub const HEALTH_DISCREPANCY_PENALTY: f64 = 15.0;

/// Points deducted for a temporal misalignment.
pub const TEMPORAL_DISCREPANCY_PENALTY: f64 = 5.0;

// ===== ANOMALY CORROBORATION =====

/// Confidence (%) below which an uncorroborated anomaly is dropped.
pub const CORROBORATION_CONFIDENCE_FLOOR: f64 = 60.0;

/// Relative value agreement required for two reports to corroborate.
pub const CORROBORATION_VALUE_TOLERANCE: f64 = 0.2;

/// Independent sources needed to corroborate an anomaly.
pub const MIN_CORROBORATING_SOURCES: usize = 2;
