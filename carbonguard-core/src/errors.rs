//! Error Types for Monitoring Requests
//!
//! ## Design Philosophy
//!
//! CarbonGuard separates *bad requests* from *bad data*:
//!
//! 1. **Bad requests fail fast**: an inverted date range, a negative project
//!    area or an unknown sensor type can never produce a meaningful result, so
//!    they are rejected before any computation runs.
//!
//! 2. **Bad data degrades, it never errors**: empty series, zero sensors or
//!    noisy readings are encoded in scores, flags and blockers. A readiness
//!    report always renders, even when the evidence is thin.
//!
//! 3. **Rule failures stay local**: a validation rule that cannot evaluate
//!    returns [`MonitoringError::RuleEvaluation`]. The validation pipeline
//!    records it as a non-critical failure and keeps going.
//!
//! ## Error Categories
//!
//! ### Invalid Input
//! - `InvalidRange`: end of a date range precedes its start
//! - `InvalidInput`: a field outside its structural domain (latitude 120°)
//! - `NegativeArea`: project area that is zero, negative or not finite
//! - `UnknownSensorType`: sensor type string with no known profile
//! - `UnorderedSeries`: timestamps going backwards inside one series
//!
//! ### Local Failures
//! - `RuleEvaluation`: a single validation rule could not be evaluated
//!
//! ### Setup
//! - `Config`: configuration document could not be read or parsed
//!
//! ## Handling Strategy
//!
//! ```rust
//! use carbonguard_core::{DateRange, MonitoringError};
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//!
//! match DateRange::new(start, end) {
//!     Ok(_) => {}
//!     Err(MonitoringError::InvalidRange { .. }) => {
//!         // Reject the request - nothing to analyze
//!     }
//!     Err(_) => {}
//! }
//! ```

use chrono::{DateTime, Utc};
use thiserror_no_std::Error;

/// Result type for monitoring operations
pub type MonitoringResult<T> = Result<T, MonitoringError>;

/// Errors raised for structurally invalid requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitoringError {
    /// Date range ends before it starts
    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidRange {
        /// Requested start of the range
        start: DateTime<Utc>,
        /// Requested end of the range
        end: DateTime<Utc>,
    },

    /// A field is outside its structural domain
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Project area must be a positive, finite number of hectares
    #[error("Project area must be positive, got {area}")]
    NegativeArea {
        /// The rejected area in hectares
        area: f64,
    },

    /// No profile exists for this sensor type
    #[error("Unknown sensor type: {0}")]
    UnknownSensorType(String),

    /// Timestamps within a single series went backwards
    #[error("Timestamps in series {series} are not monotonically non-decreasing")]
    UnorderedSeries {
        /// Identifier of the offending series
        series: String,
    },

    /// A validation rule could not evaluate its input
    #[error("Rule {rule} could not be evaluated: {reason}")]
    RuleEvaluation {
        /// Name of the rule
        rule: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitoringError {
    /// True for errors that reject the request outright
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. }
                | Self::InvalidInput { .. }
                | Self::NegativeArea { .. }
                | Self::UnknownSensorType(_)
                | Self::UnorderedSeries { .. }
        )
    }
}
