//! Monitoring configuration
//!
//! Every stage config has a `Default` built from [`crate::constants`], and
//! every field is optional in JSON, so a document only needs the values it
//! overrides:
//!
//! ```rust
//! use carbonguard_core::MonitoringConfig;
//!
//! let config = MonitoringConfig::from_json_str(r#"{
//!     "crossSource": { "sensorHealthScale": 12.5 },
//!     "validation": { "approveThreshold": 90.0 }
//! }"#).unwrap();
//!
//! assert_eq!(config.cross_source.sensor_health_scale, 12.5);
//! assert_eq!(config.satellite.index_cadence_days, 10);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::time::MAX_CONFIG_SPAN_DAYS;
use crate::cross_source::CrossSourceConfig;
use crate::errors::{MonitoringError, MonitoringResult};
use crate::readiness::ReadinessConfig;
use crate::satellite::SatelliteConfig;
use crate::sensor::AggregatorConfig;
use crate::validation::ValidationConfig;

/// Configuration of every core stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitoringConfig {
    pub satellite: SatelliteConfig,
    pub sensor: AggregatorConfig,
    pub validation: ValidationConfig,
    pub cross_source: CrossSourceConfig,
    pub readiness: ReadinessConfig,
}

impl MonitoringConfig {
    /// Parse a JSON document and check it with [`validate`](Self::validate)
    pub fn from_json_str(json: &str) -> MonitoringResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MonitoringError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MonitoringResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MonitoringError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Reject cadences and reading ages outside `1..=MAX_CONFIG_SPAN_DAYS` days
    pub fn validate(&self) -> MonitoringResult<()> {
        let spans = [
            ("satellite.indexCadenceDays", self.satellite.index_cadence_days, 1),
            ("satellite.radarCadenceDays", self.satellite.radar_cadence_days, 1),
            ("validation.maxReadingAgeDays", self.validation.max_reading_age_days, 1),
            ("validation.freshReadingAgeHours", self.validation.fresh_reading_age_hours, 24),
        ];
        for (field, value, units_per_day) in spans {
            if !(1..=MAX_CONFIG_SPAN_DAYS * units_per_day).contains(&value) {
                return Err(MonitoringError::Config(format!(
                    "{} = {} is outside 1..={}",
                    field,
                    value,
                    MAX_CONFIG_SPAN_DAYS * units_per_day
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_string(&self) -> MonitoringResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MonitoringError::Config(e.to_string()))
    }
}
