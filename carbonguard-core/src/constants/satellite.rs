//! Satellite Index Thresholds and Calibration
//!
//! Cadences, allometric calibration and the degradation thresholds used by
//! the satellite analyzer.

// ===== SAMPLING CADENCE =====

/// Days between vegetation index samples.
///
/// Matches the revisit period of a single optical constellation.
pub const INDEX_CADENCE_DAYS: i64 = 10;

/// Days between radar backscatter samples.
///
/// Matches a 12-day SAR repeat orbit.
pub const RADAR_CADENCE_DAYS: i64 = 12;

// ===== ALLOMETRIC CALIBRATION =====

/// Allometric scale coefficient `a` in `biomass = a * index^b`.
///
/// Default ecosystem calibration, biomass in t/ha.
pub const ALLOMETRIC_A: f64 = 5.2;

/// Allometric exponent `b` in `biomass = a * index^b`.
pub const ALLOMETRIC_B: f64 = 2.1;

// ===== DEGRADATION FLAGS =====

/// Drop between the last two index samples that flags `INDEX_DROP_DETECTED`.
pub const INDEX_DROP_THRESHOLD: f64 = 0.15;

/// Series average below which `LOW_DENSITY` is flagged.
pub const LOW_DENSITY_THRESHOLD: f64 = 0.4;

/// Fraction of low-quality samples above which `HIGH_CLOUD_COVER` is flagged.
pub const LOW_QUALITY_FRACTION_THRESHOLD: f64 = 0.3;

/// Change vs. historical baseline (percent) below which `SIGNIFICANT_DECLINE` is flagged.
pub const SIGNIFICANT_DECLINE_PCT: f64 = -10.0;

/// Health points deducted per degradation flag.
pub const FLAG_PENALTY: f64 = 5.0;

/// Tolerance applied to threshold comparisons on index differences.
///
/// `0.70 - 0.55` is `0.1499999…` in binary floating point; the tolerance
/// keeps an exact 0.15 drop on the flagged side.
pub const THRESHOLD_TOLERANCE: f64 = 1e-9;

// ===== HEALTH SCORE =====

/// Weight of the rescaled vegetation index in the health score.
pub const HEALTH_INDEX_WEIGHT: f64 = 0.4;

/// Weight of the rescaled radar backscatter in the health score.
pub const HEALTH_RADAR_WEIGHT: f64 = 0.3;

/// Unpenalized base points (the remaining 30% of weight).
pub const HEALTH_BASE_POINTS: f64 = 30.0;

/// Backscatter (dB) that maps to a radar score of 0.
pub const RADAR_FLOOR_DB: f64 = -25.0;

/// Backscatter span (dB) that maps onto the 0-100 radar score.
pub const RADAR_SPAN_DB: f64 = 20.0;

// ===== SAMPLE QUALITY =====

/// Cloud cover (%) below which an optical sample is high quality.
pub const CLOUD_HIGH_QUALITY_MAX_PCT: f64 = 20.0;

/// Cloud cover (%) below which an optical sample is medium quality.
pub const CLOUD_MEDIUM_QUALITY_MAX_PCT: f64 = 50.0;
