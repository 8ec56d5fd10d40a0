//! Satellite Index Analysis
//!
//! ## Overview
//!
//! Turns per-date optical and radar observations into a vegetation-index
//! time series, a biomass estimate, degradation flags and a 0-100 ecosystem
//! health score.
//!
//! ```text
//! ObservationProvider ──► optical (NIR, RED, cloud) ──► index = (NIR-RED)/(NIR+RED)
//!                     └─► radar backscatter (dB)
//!                                │
//!        ┌───────────────────────┼──────────────────────┐
//!        ▼                       ▼                      ▼
//!   biomass = a·idx^b     degradation flags      health score
//! ```
//!
//! ## Data Sources
//!
//! Observations come from an injected [`ObservationProvider`]. The analyzer
//! never generates data itself; [`SyntheticProvider`] is a deterministic
//! provider for tests and demonstrations.
//!
//! ## Caching
//!
//! Results can be memoized in a caller-owned [`AnalysisCache`]. The analyzer
//! holds no cache of its own.
//!
//! ## Usage Example
//!
//! ```rust
//! use carbonguard_core::satellite::{DataType, SatelliteAnalyzer, SyntheticProvider};
//! use carbonguard_core::{DateRange, EcosystemType, SiteLocation};
//! use chrono::{TimeZone, Utc};
//!
//! let analyzer = SatelliteAnalyzer::new(SyntheticProvider::default());
//! let site = SiteLocation::new(-2.5, 140.7, EcosystemType::Mangrove);
//! let range = DateRange::new(
//!     Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(),
//! )?;
//!
//! let result = analyzer.analyze(&site, &range, DataType::Combined)?;
//! assert!(result.health_score >= 0.0 && result.health_score <= 100.0);
//! # Ok::<(), carbonguard_core::MonitoringError>(())
//! ```

mod analyzer;
mod cache;
mod provider;

pub use analyzer::{
    data_quality, detect_degradation, ecosystem_health_score, estimate_biomass_from_index,
    radar_score, vegetation_index, SatelliteAnalyzer, SatelliteConfig,
};
pub use cache::{AnalysisCache, CacheKey, LruAnalysisCache};
pub use provider::{ObservationProvider, OpticalObservation, RadarObservation, SyntheticProvider};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::SiteLocation;
use crate::time::DateRange;

/// Quality class of a single satellite sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleQuality {
    High,
    Medium,
    Low,
}

/// Which observations an analysis run requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    VegetationIndex,
    Radar,
    #[default]
    Combined,
}

impl DataType {
    pub const fn includes_index(&self) -> bool {
        matches!(self, DataType::VegetationIndex | DataType::Combined)
    }

    pub const fn includes_radar(&self) -> bool {
        matches!(self, DataType::Radar | DataType::Combined)
    }
}

/// One vegetation index observation, value in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationIndexSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Confidence in [0, 100]
    pub confidence: f64,
    pub quality: SampleQuality,
}

/// One radar backscatter observation in dB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarSample {
    pub timestamp: DateTime<Utc>,
    pub backscatter: f64,
    /// Confidence in [0, 100]
    pub confidence: f64,
    pub quality: SampleQuality,
}

/// How a biomass figure was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiomassMethod {
    Allometric,
    Lidar,
    Calibrated,
}

/// Above-ground biomass estimate in t/ha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomassEstimate {
    pub estimated_biomass: f64,
    pub method: BiomassMethod,
    /// Confidence in [0, 100]
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

/// Degradation signals raised by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegradationFlag {
    IndexDropDetected,
    LowDensity,
    HighCloudCover,
    SignificantDecline,
}

impl DegradationFlag {
    /// Wire tag of the flag
    pub const fn tag(&self) -> &'static str {
        match self {
            DegradationFlag::IndexDropDetected => "INDEX_DROP_DETECTED",
            DegradationFlag::LowDensity => "LOW_DENSITY",
            DegradationFlag::HighCloudCover => "HIGH_CLOUD_COVER",
            DegradationFlag::SignificantDecline => "SIGNIFICANT_DECLINE",
        }
    }
}

/// Observation quality of an analysis run, percentages in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteDataQuality {
    pub cloud_cover_pct: f64,
    pub completeness_pct: f64,
}

/// Output of one satellite analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteAnalysisResult {
    pub location: SiteLocation,
    pub date_range: DateRange,
    pub data_type: DataType,
    /// Most recent observation, or the end of the range when there is none
    pub analysis_date: DateTime<Utc>,
    pub index_series: Vec<VegetationIndexSample>,
    pub radar_series: Vec<RadarSample>,
    pub biomass: BiomassEstimate,
    /// Change of the average index vs. the historical baseline, in percent
    pub vegetation_cover_change_pct: Option<f64>,
    pub degradation_flags: Vec<DegradationFlag>,
    pub health_score: f64,
    pub data_quality: SatelliteDataQuality,
}

impl SatelliteAnalysisResult {
    /// Whether the run produced any observation at all
    pub fn has_observations(&self) -> bool {
        !self.index_series.is_empty() || !self.radar_series.is_empty()
    }

    /// Timestamps of every sample, ascending
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        let mut all: Vec<_> = self
            .index_series
            .iter()
            .map(|s| s.timestamp)
            .chain(self.radar_series.iter().map(|s| s.timestamp))
            .collect();
        all.sort();
        all
    }

    pub fn has_flag(&self, flag: DegradationFlag) -> bool {
        self.degradation_flags.contains(&flag)
    }
}
