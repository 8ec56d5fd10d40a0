//! In-Situ Sensor Data
//!
//! ## Overview
//!
//! Sensors stream readings continuously; the aggregator condenses a batch of
//! readings for one device into summary statistics, a data-quality score and
//! a list of per-reading anomaly flags.
//!
//! ## Sensor Profiles
//!
//! Each [`SensorType`] knows its plausible physical range and the largest
//! believable change between consecutive readings:
//!
//! | Type              | Range          | Jump  |
//! |-------------------|----------------|-------|
//! | Dissolved oxygen  | 3 - 10 mg/L    | 2     |
//! | Temperature       | 0 - 40 °C      | 5     |
//! | Salinity          | 0 - 40 PSU     | 5     |
//! | pH                | 6.5 - 8.5      | 0.5   |
//! | CO2 flux          | 0 - 200        | 50    |
//!
//! Readings outside the range are sensor faults (high severity). Jumps
//! beyond the threshold suggest interference or fouling (medium severity).

mod aggregator;
mod registry;

pub use aggregator::{AggregatorConfig, SensorAggregator};
pub use registry::{DeviceStatus, SensorDevice, SensorRegistry};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::Severity;
use crate::constants::sensors::*;
use crate::errors::MonitoringError;
use crate::location::GeoPoint;
use crate::stats::SeriesStats;

/// Physical quantity a sensor measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    DissolvedOxygen,
    Temperature,
    Salinity,
    Ph,
    Co2Flux,
}

/// Plausible range and jump threshold of a sensor type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorProfile {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    /// Largest believable change between consecutive readings
    pub jump_threshold: f64,
}

impl SensorProfile {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl SensorType {
    pub const ALL: [SensorType; 5] = [
        SensorType::DissolvedOxygen,
        SensorType::Temperature,
        SensorType::Salinity,
        SensorType::Ph,
        SensorType::Co2Flux,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            SensorType::DissolvedOxygen => "dissolved_oxygen",
            SensorType::Temperature => "temperature",
            SensorType::Salinity => "salinity",
            SensorType::Ph => "ph",
            SensorType::Co2Flux => "co2_flux",
        }
    }

    pub const fn profile(&self) -> SensorProfile {
        match self {
            SensorType::DissolvedOxygen => SensorProfile {
                min: DISSOLVED_OXYGEN_MIN_MG_L,
                max: DISSOLVED_OXYGEN_MAX_MG_L,
                unit: "mg/L",
                jump_threshold: DISSOLVED_OXYGEN_JUMP_MG_L,
            },
            SensorType::Temperature => SensorProfile {
                min: TEMPERATURE_MIN_C,
                max: TEMPERATURE_MAX_C,
                unit: "°C",
                jump_threshold: TEMPERATURE_JUMP_C,
            },
            SensorType::Salinity => SensorProfile {
                min: SALINITY_MIN_PSU,
                max: SALINITY_MAX_PSU,
                unit: "PSU",
                jump_threshold: SALINITY_JUMP_PSU,
            },
            SensorType::Ph => SensorProfile {
                min: PH_MIN,
                max: PH_MAX,
                unit: "pH",
                jump_threshold: PH_JUMP,
            },
            SensorType::Co2Flux => SensorProfile {
                min: CO2_FLUX_MIN,
                max: CO2_FLUX_MAX,
                unit: "µmol/m²/s",
                jump_threshold: CO2_FLUX_JUMP,
            },
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorType {
    type Err = MonitoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "dissolved_oxygen" | "do" | "oxygen" => Ok(SensorType::DissolvedOxygen),
            "temperature" | "temp" => Ok(SensorType::Temperature),
            "salinity" => Ok(SensorType::Salinity),
            "ph" => Ok(SensorType::Ph),
            "co2_flux" | "co2" => Ok(SensorType::Co2Flux),
            _ => Err(MonitoringError::UnknownSensorType(s.to_string())),
        }
    }
}

/// Quality flag reported by the device with each reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingQuality {
    Valid,
    Questionable,
    Bad,
}

/// One reading from one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub quality: ReadingQuality,
    /// Device-reported confidence in [0, 100]
    pub confidence: f64,
}

/// Why a reading was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    OutOfRange,
    StatisticalOutlier,
    SuddenJump,
}

/// Per-reading anomaly flag raised during aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub kind: FlagKind,
    pub severity: Severity,
    pub reason: String,
}

/// Count of readings per device quality flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCounts {
    pub valid: usize,
    pub questionable: usize,
    pub bad: usize,
}

/// Window covered by an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Summary of one device's readings over one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSensorData {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub location: GeoPoint,
    /// `None` when there were no readings
    pub window: Option<TimeWindow>,
    pub reading_count: usize,
    pub statistics: SeriesStats,
    pub anomaly_flags: Vec<AnomalyFlag>,
    /// Valid share x 100 x drift derating, in [0, 100]
    pub data_quality: f64,
    pub quality_counts: QualityCounts,
    /// Mean device confidence, in [0, 100]
    pub mean_confidence: f64,
    /// Reading timestamps in order, used for temporal alignment
    pub timestamps: Vec<DateTime<Utc>>,
}

impl AggregatedSensorData {
    pub fn has_readings(&self) -> bool {
        self.reading_count > 0
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.window.map(|w| w.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types() {
        assert_eq!("Dissolved Oxygen".parse::<SensorType>().unwrap(), SensorType::DissolvedOxygen);
        assert_eq!("co2-flux".parse::<SensorType>().unwrap(), SensorType::Co2Flux);
        assert_eq!("pH".parse::<SensorType>().unwrap(), SensorType::Ph);
    }

    #[test]
    fn unknown_type_fails_fast() {
        let err = "lidar".parse::<SensorType>().unwrap_err();
        assert_eq!(err, MonitoringError::UnknownSensorType("lidar".into()));
    }

    #[test]
    fn profiles_match_documented_ranges() {
        let ph = SensorType::Ph.profile();
        assert!(ph.contains(7.0));
        assert!(!ph.contains(9.0));
        assert_eq!(SensorType::DissolvedOxygen.profile().min, 3.0);
        assert_eq!(SensorType::Co2Flux.profile().max, 200.0);
    }
}
