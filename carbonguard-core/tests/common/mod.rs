//! Common fixtures for integration tests
//!
//! - Fixed instants and sites so every run is reproducible
//! - Reading generators with a diurnal cycle
//! - Pre-built project scenarios (healthy, data-starved, gappy)

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use carbonguard_core::{DateRange, EcosystemType, FixedClock, ProjectMetadata, SiteLocation};

pub mod generators;
pub mod scenarios;

/// Midnight UTC on 2024-03-01 plus `days`
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(days)
}

pub fn range(start_day: i64, end_day: i64) -> DateRange {
    DateRange::new(day(start_day), day(end_day)).unwrap()
}

pub fn mangrove_site() -> SiteLocation {
    SiteLocation::new(-2.55, 140.72, EcosystemType::Mangrove)
}

pub fn project(start_day: i64, end_day: i64) -> ProjectMetadata {
    ProjectMetadata::new(
        "cg-test-001",
        "Youtefa Bay mangrove restoration",
        mangrove_site(),
        120.0,
        range(start_day, end_day),
    )
    .unwrap()
}

/// Clock pinned `hours` after the start of `end_day`
pub fn clock_after(end_day: i64, hours: i64) -> FixedClock {
    FixedClock::new(day(end_day) + Duration::hours(hours))
}
