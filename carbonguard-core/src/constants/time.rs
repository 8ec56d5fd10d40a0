//! Time Conversions and Windows
//!
//! Durations used for alignment, staleness and freshness decisions.

// ===== CONVERSIONS =====

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Days in a (non-leap) year, used to annualize sequestration rates.
pub const DAYS_PER_YEAR: f64 = 365.0;

// ===== ALIGNMENT =====

/// Gap between consecutive samples (days) that counts as a coverage gap.
///
/// Also the tolerance between sources' most recent timestamps.
pub const ALIGNMENT_GAP_DAYS: f64 = 7.0;

/// Window (seconds) within which two anomaly reports can corroborate.
pub const CORROBORATION_WINDOW_SECONDS: i64 = SECONDS_PER_HOUR;

// ===== CONFIGURATION LIMITS =====

/// Longest cadence or reading age (days) a configuration may set.
///
/// One century; larger values cannot be turned into chrono durations
/// safely once added to a timestamp.
pub const MAX_CONFIG_SPAN_DAYS: i64 = 36_500;

// ===== FRESHNESS BUCKETS =====

/// Newest data at most this old (seconds) is real-time.
pub const FRESHNESS_REAL_TIME_SECONDS: i64 = SECONDS_PER_HOUR;

/// Newest data at most this old (seconds) is current.
pub const FRESHNESS_CURRENT_SECONDS: i64 = SECONDS_PER_DAY;

/// Newest data at most this old (seconds) is recent; older is stale.
pub const FRESHNESS_RECENT_SECONDS: i64 = 7 * SECONDS_PER_DAY;
