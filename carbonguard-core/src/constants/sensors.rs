//! Sensor Plausible Ranges
//!
//! Physical bounds for the in-situ sensor types deployed on blue-carbon and
//! forest projects. Readings outside these ranges are treated as sensor
//! faults, not environmental signal.
//!
//! Each type also carries a fixed jump threshold: the largest plausible
//! change between consecutive readings, in the type's own unit. It does not
//! scale with the window's standard deviation; spread-relative deviation is
//! covered by the aggregator's `outlier_sigma` check instead.

// ===== DISSOLVED OXYGEN =====

/// Minimum plausible dissolved oxygen (mg/L).
///
/// Below this coastal water is hypoxic; sustained readings indicate probe fouling.
pub const DISSOLVED_OXYGEN_MIN_MG_L: f64 = 3.0;

/// Maximum plausible dissolved oxygen (mg/L).
pub const DISSOLVED_OXYGEN_MAX_MG_L: f64 = 10.0;

/// Largest plausible change between consecutive dissolved oxygen readings (mg/L).
pub const DISSOLVED_OXYGEN_JUMP_MG_L: f64 = 2.0;

// ===== TEMPERATURE =====

/// Minimum plausible water/soil temperature (°C).
pub const TEMPERATURE_MIN_C: f64 = 0.0;

/// Maximum plausible water/soil temperature (°C).
pub const TEMPERATURE_MAX_C: f64 = 40.0;

/// Largest plausible change between consecutive temperature readings (°C).
pub const TEMPERATURE_JUMP_C: f64 = 5.0;

// ===== SALINITY =====

/// Minimum plausible salinity (PSU).
pub const SALINITY_MIN_PSU: f64 = 0.0;

/// Maximum plausible salinity (PSU).
pub const SALINITY_MAX_PSU: f64 = 40.0;

/// Largest plausible change between consecutive salinity readings (PSU).
pub const SALINITY_JUMP_PSU: f64 = 5.0;

// ===== PH =====

/// Minimum plausible pH for estuarine water.
pub const PH_MIN: f64 = 6.5;

/// Maximum plausible pH for estuarine water.
pub const PH_MAX: f64 = 8.5;

/// Largest plausible change between consecutive pH readings.
pub const PH_JUMP: f64 = 0.5;

// ===== CO2 FLUX =====

/// Minimum plausible CO2 flux (µmol/m²/s).
pub const CO2_FLUX_MIN: f64 = 0.0;

/// Maximum plausible CO2 flux (µmol/m²/s).
pub const CO2_FLUX_MAX: f64 = 200.0;

/// Largest plausible change between consecutive CO2 flux readings.
pub const CO2_FLUX_JUMP: f64 = 50.0;

// ===== AGGREGATION =====

/// Derating factor applied to the valid-reading fraction to reflect drift.
pub const DRIFT_DERATING: f64 = 0.95;

/// Standard deviations from the mean that mark a reading as an outlier.
pub const OUTLIER_SIGMA: f64 = 3.0;
