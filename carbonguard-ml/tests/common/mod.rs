//! Shared fixtures for the detection and pipeline tests
//!
//! Series come from a seeded RNG so every failure reproduces.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use carbonguard_core::sensor::{ReadingQuality, SensorReading, SensorType};
use carbonguard_core::{
    DateRange, EcosystemType, FixedClock, ProjectMetadata, SeriesPoint, SiteLocation,
};

/// Midnight UTC on 2024-06-01 plus `hours`
pub fn hour(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}

pub fn project(days: i64) -> ProjectMetadata {
    ProjectMetadata::new(
        "cg-ml-001",
        "Segara Anakan mangrove buffer",
        SiteLocation::new(-7.7, 108.9, EcosystemType::Mangrove),
        80.0,
        DateRange::new(hour(0), hour(days * 24)).unwrap(),
    )
    .unwrap()
}

pub fn clock_after(days: i64) -> FixedClock {
    FixedClock::new(hour(days * 24 + 1))
}

/// `len` hourly values of `base` with uniform noise of half-width `noise`
pub fn noisy(seed: u64, len: usize, base: f64, noise: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| base + rng.gen_range(-noise..=noise)).collect()
}

pub fn series(values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| SeriesPoint::new(hour(i as i64), v))
        .collect()
}

pub fn readings(sensor_id: &str, sensor_type: SensorType, values: &[f64]) -> Vec<SensorReading> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| SensorReading {
            sensor_id: sensor_id.to_string(),
            timestamp: hour(i as i64),
            value,
            unit: sensor_type.profile().unit.to_string(),
            quality: ReadingQuality::Valid,
            confidence: 90.0,
        })
        .collect()
}
