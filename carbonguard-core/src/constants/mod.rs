//! Constants for CarbonGuard Core
//!
//! This module provides centralized, documented constants used throughout
//! the monitoring pipeline. Every threshold the scoring stages compare
//! against lives here, so a reviewer can audit the whole numeric contract
//! in one place.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Satellite**: Index cadence, calibration and degradation thresholds
//! - **Sensors**: Plausible ranges and jump thresholds per sensor type
//! - **Quality**: Validation scoring and recommendation cut-offs
//! - **Time**: Day/hour conversions, alignment windows, freshness buckets
//! - **Readiness**: Carbon accounting and coverage constants
//!
//! ## Usage Guidelines
//!
//! 1. Use these constants instead of magic numbers
//! 2. Config structs take their `Default` values from here
//! 3. Include units in names where a unit applies

/// Satellite cadence, calibration and degradation thresholds.
pub mod satellite;

/// Plausible physical ranges and jump thresholds for in-situ sensors.
pub mod sensors;

/// Validation scoring and recommendation thresholds.
pub mod quality;

/// Time conversions, alignment windows and freshness buckets.
pub mod time;

/// Carbon accounting, spatial grid and readiness thresholds.
pub mod readiness;

/// Guard added to denominators so ratios never divide by zero.
pub const EPSILON: f64 = 1e-9;

pub use satellite::{
    ALLOMETRIC_A, ALLOMETRIC_B, INDEX_CADENCE_DAYS, RADAR_CADENCE_DAYS,
    INDEX_DROP_THRESHOLD, LOW_DENSITY_THRESHOLD,
};

pub use quality::{
    QUALITY_APPROVE_THRESHOLD, QUALITY_VALID_THRESHOLD, QUALITY_MORE_DATA_THRESHOLD,
};

pub use time::{SECONDS_PER_DAY, SECONDS_PER_HOUR, ALIGNMENT_GAP_DAYS};

pub use readiness::{BASELINE_SEQUESTRATION_RATE, CARBON_FRACTION, READINESS_THRESHOLD};
