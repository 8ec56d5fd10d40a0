//! Observation providers
//!
//! The analyzer asks a provider for raw observations per sampling date.
//! Providers may return `None` when nothing was acquired on that date.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::location::SiteLocation;

use super::SampleQuality;

/// Optical reflectance pair for one acquisition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalObservation {
    /// Near-infrared reflectance
    pub nir: f64,
    /// Red reflectance
    pub red: f64,
    /// Fraction of the scene obscured by cloud, in percent
    pub cloud_cover_pct: f64,
    /// Acquisition confidence in [0, 100]
    pub confidence: f64,
}

/// Radar backscatter for one acquisition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarObservation {
    pub backscatter_db: f64,
    /// Acquisition confidence in [0, 100]
    pub confidence: f64,
    pub quality: SampleQuality,
}

/// Supplies raw observations to the satellite analyzer
pub trait ObservationProvider {
    /// Optical acquisition nearest to `at`
    fn optical(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<OpticalObservation>;

    /// Radar acquisition nearest to `at`
    fn radar(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<RadarObservation>;

    /// Historical baseline index for the site, when one is on record
    fn baseline_index(&self, _site: &SiteLocation) -> Option<f64> {
        None
    }
}

impl<P: ObservationProvider + ?Sized> ObservationProvider for &P {
    fn optical(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<OpticalObservation> {
        (**self).optical(site, at)
    }

    fn radar(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<RadarObservation> {
        (**self).radar(site, at)
    }

    fn baseline_index(&self, site: &SiteLocation) -> Option<f64> {
        (**self).baseline_index(site)
    }
}

/// Red reflectance the synthetic provider anchors its band pair on
const SYNTHETIC_RED: f64 = 0.08;

/// Deterministic provider: ecosystem baseline + seasonal cycle + hashed noise
///
/// Same seed, site and date always give the same observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticProvider {
    pub seed: u64,
    /// Amplitude of the annual cycle added to the baseline index
    pub seasonal_amplitude: f64,
    /// Half-width of the uniform noise added to the index
    pub noise_amplitude: f64,
    /// Cloud cover reported on every optical acquisition
    pub cloud_cover_pct: f64,
    /// Shift applied to the ecosystem baseline (negative simulates loss)
    pub index_offset: f64,
    /// Historical baseline returned to the analyzer
    pub historical_baseline: Option<f64>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            seed: 42,
            seasonal_amplitude: 0.05,
            noise_amplitude: 0.02,
            cloud_cover_pct: 10.0,
            index_offset: 0.0,
            historical_baseline: None,
        }
    }
}

impl SyntheticProvider {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// Index the provider targets for a site and date, before band synthesis
    pub fn target_index(&self, site: &SiteLocation, at: DateTime<Utc>) -> f64 {
        let day = at.ordinal() as f64;
        let seasonal = self.seasonal_amplitude * (2.0 * std::f64::consts::PI * day / 365.0).sin();
        let noise = self.noise_amplitude * (2.0 * self.unit_noise(site, at, 0) - 1.0);
        (site.ecosystem.baseline_index() + self.index_offset + seasonal + noise).clamp(-0.95, 0.95)
    }

    /// Uniform value in [0, 1) from a splitmix64 hash of the inputs
    fn unit_noise(&self, site: &SiteLocation, at: DateTime<Utc>, stream: u64) -> f64 {
        let (lat, lon) = site.point.micro_degrees();
        let mut x = self
            .seed
            .wrapping_add(lat as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(lon as u64)
            .wrapping_add((at.timestamp() / 86_400) as u64)
            .wrapping_add(stream.wrapping_mul(0xD1B5_4A32_D192_ED03));
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^= x >> 31;
        (x >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl ObservationProvider for SyntheticProvider {
    fn optical(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<OpticalObservation> {
        let index = self.target_index(site, at);
        // Invert (nir - red) / (nir + red) = index for a fixed red band
        let nir = SYNTHETIC_RED * (1.0 + index) / (1.0 - index);
        let cloud = self.cloud_cover_pct.clamp(0.0, 100.0);
        Some(OpticalObservation {
            nir,
            red: SYNTHETIC_RED,
            cloud_cover_pct: cloud,
            confidence: (95.0 - cloud * 0.5).clamp(0.0, 100.0),
        })
    }

    fn radar(&self, site: &SiteLocation, at: DateTime<Utc>) -> Option<RadarObservation> {
        let index = self.target_index(site, at);
        let noise = 2.0 * self.unit_noise(site, at, 1) - 1.0;
        Some(RadarObservation {
            backscatter_db: -20.0 + 12.0 * index + noise,
            confidence: 85.0,
            quality: SampleQuality::High,
        })
    }

    fn baseline_index(&self, _site: &SiteLocation) -> Option<f64> {
        self.historical_baseline
    }
}
