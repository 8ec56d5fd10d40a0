//! Geographic locations and ecosystem classes

use serde::{Deserialize, Serialize};

use crate::errors::{MonitoringError, MonitoringResult};

/// WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject coordinates outside the WGS84 domain
    pub fn validate(&self) -> MonitoringResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(MonitoringError::InvalidInput {
                field: "latitude",
                reason: "must be within [-90, 90]",
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(MonitoringError::InvalidInput {
                field: "longitude",
                reason: "must be within [-180, 180]",
            });
        }
        Ok(())
    }

    /// Micro-degree grid key, stable for hashing
    pub fn micro_degrees(&self) -> (i64, i64) {
        (
            (self.latitude * 1e6).round() as i64,
            (self.longitude * 1e6).round() as i64,
        )
    }
}

/// Ecosystem class of a project site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemType {
    #[default]
    Mangrove,
    Seagrass,
    SaltMarsh,
    TropicalForest,
    TemperateForest,
    Grassland,
}

impl EcosystemType {
    pub const fn name(&self) -> &'static str {
        match self {
            EcosystemType::Mangrove => "mangrove",
            EcosystemType::Seagrass => "seagrass",
            EcosystemType::SaltMarsh => "salt_marsh",
            EcosystemType::TropicalForest => "tropical_forest",
            EcosystemType::TemperateForest => "temperate_forest",
            EcosystemType::Grassland => "grassland",
        }
    }

    /// Typical healthy vegetation index for the ecosystem
    pub const fn baseline_index(&self) -> f64 {
        match self {
            EcosystemType::Mangrove => 0.65,
            EcosystemType::Seagrass => 0.35,
            EcosystemType::SaltMarsh => 0.5,
            EcosystemType::TropicalForest => 0.8,
            EcosystemType::TemperateForest => 0.7,
            EcosystemType::Grassland => 0.45,
        }
    }
}

/// Project site analyzed by the satellite stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub point: GeoPoint,
    pub ecosystem: EcosystemType,
}

impl SiteLocation {
    pub fn new(latitude: f64, longitude: f64, ecosystem: EcosystemType) -> Self {
        Self { point: GeoPoint::new(latitude, longitude), ecosystem }
    }
}
