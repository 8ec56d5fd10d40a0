//! Deterministic reading generators
//!
//! Values follow a diurnal sine around a base level. A small hashed jitter
//! keeps the series from being perfectly smooth without pulling in an RNG.

use chrono::{DateTime, Duration, Utc};

use carbonguard_core::sensor::{ReadingQuality, SensorReading, SensorType};

pub struct ReadingGenerator {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub base: f64,
    pub diurnal_amplitude: f64,
    pub jitter: f64,
    pub confidence: f64,
}

impl ReadingGenerator {
    pub fn new(sensor_id: &str, sensor_type: SensorType, base: f64) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            sensor_type,
            base,
            diurnal_amplitude: 0.2,
            jitter: 0.05,
            confidence: 90.0,
        }
    }

    /// Hourly readings from `start` for `hours` hours
    pub fn hourly(&self, start: DateTime<Utc>, hours: i64) -> Vec<SensorReading> {
        (0..hours).map(|h| self.reading(start + Duration::hours(h), h)).collect()
    }

    /// One reading every `step_hours` from `start` through `end` inclusive
    pub fn every(&self, start: DateTime<Utc>, end: DateTime<Utc>, step_hours: i64) -> Vec<SensorReading> {
        let mut out = Vec::new();
        let mut at = start;
        let mut i = 0;
        while at <= end {
            out.push(self.reading(at, i));
            at += Duration::hours(step_hours);
            i += 1;
        }
        out
    }

    fn reading(&self, at: DateTime<Utc>, i: i64) -> SensorReading {
        let hour = (at.timestamp() / 3600 % 24) as f64;
        let diurnal = self.diurnal_amplitude * (2.0 * std::f64::consts::PI * hour / 24.0).sin();
        let jitter = self.jitter * (((i * 7919) % 13) as f64 / 6.0 - 1.0);
        SensorReading {
            sensor_id: self.sensor_id.clone(),
            timestamp: at,
            value: self.base + diurnal + jitter,
            unit: self.sensor_type.profile().unit.to_string(),
            quality: ReadingQuality::Valid,
            confidence: self.confidence,
        }
    }
}
