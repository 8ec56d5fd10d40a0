//! Time handling for monitoring runs
//!
//! Provides clock abstraction so every stage stays a pure function of its
//! inputs:
//! - System clock (production)
//! - Fixed clock (tests, replays, audits)
//!
//! Also defines [`DateRange`], the validated window every analysis runs over.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::time::{SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::errors::{MonitoringError, MonitoringResult};

/// Source of "now" for age and freshness decisions
pub trait TimeSource {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed time source for testing and reproducible runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    pub fn set(&mut self, instant: DateTime<Utc>) {
        self.instant = instant;
    }

    pub fn advance(&mut self, by: Duration) {
        self.instant += by;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Inclusive window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting one that ends before it starts
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> MonitoringResult<Self> {
        if end < start {
            return Err(MonitoringError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Length in fractional days
    pub fn days(&self) -> f64 {
        days_between(self.start, self.end)
    }

    /// Whether `instant` falls inside the range (inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Instants from `start` stepping by `cadence_days` while `<= end`
    pub fn steps(&self, cadence_days: i64) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        // A cadence too long to represent leaves only the start
        let step = Duration::try_days(cadence_days.max(1));
        let end = self.end;
        std::iter::successors(Some(self.start), move |t| step.and_then(|s| t.checked_add_signed(s)))
            .take_while(move |t| *t <= end)
    }
}

/// Absolute distance between two instants in fractional days
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_seconds().abs() as f64 / SECONDS_PER_DAY as f64
}

/// Absolute distance between two instants in fractional hours
pub fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (b - a).num_seconds().abs() as f64 / SECONDS_PER_HOUR as f64
}

/// Check that a sequence of timestamps never goes backwards
pub fn is_monotonic<I>(timestamps: I) -> bool
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut previous: Option<DateTime<Utc>> = None;
    for t in timestamps {
        if let Some(p) = previous {
            if t < p {
                return false;
            }
        }
        previous = Some(t);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(day(1));
        assert_eq!(clock.now(), day(1));

        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), day(3));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::new(day(10), day(1)).unwrap_err();
        assert!(matches!(err, MonitoringError::InvalidRange { .. }));

        // Zero-length ranges are fine
        assert!(DateRange::new(day(5), day(5)).is_ok());
    }

    #[test]
    fn steps_include_end_when_aligned() {
        let range = DateRange::new(day(1), day(21)).unwrap();
        let steps: Vec<_> = range.steps(10).collect();
        assert_eq!(steps, vec![day(1), day(11), day(21)]);
    }

    #[test]
    fn oversized_cadence_yields_only_start() {
        let range = DateRange::new(day(1), day(21)).unwrap();
        assert_eq!(range.steps(i64::MAX).collect::<Vec<_>>(), vec![day(1)]);
    }

    #[test]
    fn monotonic_detection() {
        assert!(is_monotonic([day(1), day(1), day(2)]));
        assert!(!is_monotonic([day(2), day(1)]));
        assert!(is_monotonic(Vec::<DateTime<Utc>>::new()));
    }

    #[test]
    fn fractional_days() {
        assert_eq!(days_between(day(1), day(31)), 30.0);
        assert_eq!(hours_between(day(2), day(1)), 24.0);
    }
}
