//! Satellite analyzer with index, biomass and health scoring
//!
//! Scoring rules:
//! - Index: `(NIR - RED) / (NIR + RED)`, clamped to [-1, 1]
//! - Biomass: `a * max(0, avg_index)^b`
//! - Health: `0.4 * index_score + 0.3 * radar_score + 30 - 5 * flags`, clamped

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::satellite::*;
use crate::constants::EPSILON;
use crate::errors::{MonitoringError, MonitoringResult};
use crate::location::SiteLocation;
use crate::stats::{clamp_score, mean, percentage};
use crate::time::DateRange;

use super::{
    AnalysisCache, BiomassEstimate, BiomassMethod, CacheKey, DataType, DegradationFlag,
    ObservationProvider, RadarSample, SampleQuality, SatelliteAnalysisResult,
    SatelliteDataQuality, VegetationIndexSample,
};

/// Tunables of the satellite analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SatelliteConfig {
    pub index_cadence_days: i64,
    pub radar_cadence_days: i64,
    pub allometric_a: f64,
    pub allometric_b: f64,
    pub index_drop_threshold: f64,
    pub low_density_threshold: f64,
    pub low_quality_fraction: f64,
    pub significant_decline_pct: f64,
    pub flag_penalty: f64,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            index_cadence_days: INDEX_CADENCE_DAYS,
            radar_cadence_days: RADAR_CADENCE_DAYS,
            allometric_a: ALLOMETRIC_A,
            allometric_b: ALLOMETRIC_B,
            index_drop_threshold: INDEX_DROP_THRESHOLD,
            low_density_threshold: LOW_DENSITY_THRESHOLD,
            low_quality_fraction: LOW_QUALITY_FRACTION_THRESHOLD,
            significant_decline_pct: SIGNIFICANT_DECLINE_PCT,
            flag_penalty: FLAG_PENALTY,
        }
    }
}

/// Stateless analyzer over an injected observation provider
#[derive(Debug, Clone)]
pub struct SatelliteAnalyzer<P> {
    provider: P,
    config: SatelliteConfig,
}

impl<P: ObservationProvider> SatelliteAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SatelliteConfig::default())
    }

    pub fn with_config(provider: P, config: SatelliteConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SatelliteConfig {
        &self.config
    }

    /// Analyze a site over a date range
    ///
    /// An empty window yields an empty result, never an error. Only an
    /// inverted range or invalid coordinates are rejected.
    pub fn analyze(
        &self,
        site: &SiteLocation,
        range: &DateRange,
        data_type: DataType,
    ) -> MonitoringResult<SatelliteAnalysisResult> {
        if range.end < range.start {
            return Err(MonitoringError::InvalidRange { start: range.start, end: range.end });
        }
        site.point.validate()?;

        let index_series = if data_type.includes_index() {
            self.sample_index(site, range)
        } else {
            Vec::new()
        };
        let radar_series = if data_type.includes_radar() {
            self.sample_radar(site, range)
        } else {
            Vec::new()
        };
        debug!(
            "satellite window {}..{}: {} index samples, {} radar samples",
            range.start,
            range.end,
            index_series.len(),
            radar_series.len()
        );

        let analysis_date = index_series
            .iter()
            .map(|s| s.timestamp)
            .chain(radar_series.iter().map(|s| s.timestamp))
            .max()
            .unwrap_or(range.end);

        let biomass = estimate_biomass_from_index(
            &index_series,
            self.config.allometric_a,
            self.config.allometric_b,
            analysis_date,
        );

        let vegetation_cover_change_pct = match (
            self.provider.baseline_index(site),
            mean(&index_values(&index_series)),
        ) {
            (Some(baseline), Some(average)) => {
                Some((average - baseline) / (baseline.abs() + EPSILON) * 100.0)
            }
            _ => None,
        };

        let degradation_flags =
            detect_degradation(&index_series, vegetation_cover_change_pct, &self.config);
        let health_score = ecosystem_health_score(
            &index_series,
            &radar_series,
            degradation_flags.len(),
            self.config.flag_penalty,
        );
        let data_quality = if index_series.is_empty() {
            data_quality(radar_series.iter().map(|s| s.quality))
        } else {
            data_quality(index_series.iter().map(|s| s.quality))
        };

        Ok(SatelliteAnalysisResult {
            location: *site,
            date_range: *range,
            data_type,
            analysis_date,
            index_series,
            radar_series,
            biomass,
            vegetation_cover_change_pct,
            degradation_flags,
            health_score,
            data_quality,
        })
    }

    /// Analyze through a caller-owned cache
    pub fn analyze_cached<C: AnalysisCache + ?Sized>(
        &self,
        cache: &mut C,
        site: &SiteLocation,
        range: &DateRange,
        data_type: DataType,
    ) -> MonitoringResult<SatelliteAnalysisResult> {
        let key = CacheKey::new(site, range, data_type);
        if let Some(hit) = cache.get(&key) {
            debug!("satellite cache hit for {:?}", key);
            return Ok(hit);
        }
        let result = self.analyze(site, range, data_type)?;
        cache.put(key, result.clone());
        Ok(result)
    }

    fn sample_index(&self, site: &SiteLocation, range: &DateRange) -> Vec<VegetationIndexSample> {
        range
            .steps(self.config.index_cadence_days)
            .filter_map(|at| {
                let obs = self.provider.optical(site, at)?;
                match vegetation_index(obs.nir, obs.red) {
                    Some(value) => Some(VegetationIndexSample {
                        timestamp: at,
                        value,
                        confidence: clamp_score(obs.confidence),
                        quality: quality_from_cloud_cover(obs.cloud_cover_pct),
                    }),
                    None => {
                        warn!("skipping non-finite optical observation at {}", at);
                        None
                    }
                }
            })
            .collect()
    }

    fn sample_radar(&self, site: &SiteLocation, range: &DateRange) -> Vec<RadarSample> {
        range
            .steps(self.config.radar_cadence_days)
            .filter_map(|at| {
                let obs = self.provider.radar(site, at)?;
                if !obs.backscatter_db.is_finite() {
                    warn!("skipping non-finite radar observation at {}", at);
                    return None;
                }
                Some(RadarSample {
                    timestamp: at,
                    backscatter: obs.backscatter_db,
                    confidence: clamp_score(obs.confidence),
                    quality: obs.quality,
                })
            })
            .collect()
    }
}

/// `(NIR - RED) / (NIR + RED)` clamped to [-1, 1], `None` for non-finite bands
pub fn vegetation_index(nir: f64, red: f64) -> Option<f64> {
    if !nir.is_finite() || !red.is_finite() {
        return None;
    }
    let denominator = nir + red;
    let denominator = if denominator.abs() < EPSILON {
        EPSILON.copysign(denominator)
    } else {
        denominator
    };
    let index = (nir - red) / denominator;
    if index.is_finite() {
        Some(index.clamp(-1.0, 1.0))
    } else {
        None
    }
}

fn quality_from_cloud_cover(cloud_cover_pct: f64) -> SampleQuality {
    if cloud_cover_pct < CLOUD_HIGH_QUALITY_MAX_PCT {
        SampleQuality::High
    } else if cloud_cover_pct < CLOUD_MEDIUM_QUALITY_MAX_PCT {
        SampleQuality::Medium
    } else {
        SampleQuality::Low
    }
}

fn index_values(samples: &[VegetationIndexSample]) -> Vec<f64> {
    samples.iter().map(|s| s.value).collect()
}

/// Allometric biomass from the series average
///
/// An empty series gives biomass 0 with confidence 0.
pub fn estimate_biomass_from_index(
    samples: &[VegetationIndexSample],
    a: f64,
    b: f64,
    last_updated: DateTime<Utc>,
) -> BiomassEstimate {
    let average = mean(&index_values(samples)).unwrap_or(0.0);
    let confidences: Vec<f64> = samples.iter().map(|s| s.confidence).collect();

    BiomassEstimate {
        estimated_biomass: a * average.max(0.0).powf(b),
        method: BiomassMethod::Allometric,
        confidence: clamp_score(mean(&confidences).unwrap_or(0.0)),
        last_updated,
    }
}

/// Evaluate the degradation flags independently of each other
pub fn detect_degradation(
    samples: &[VegetationIndexSample],
    cover_change_pct: Option<f64>,
    config: &SatelliteConfig,
) -> Vec<DegradationFlag> {
    let mut flags = Vec::new();
    if samples.is_empty() {
        return flags;
    }

    if let [.., previous, last] = samples {
        if previous.value - last.value + THRESHOLD_TOLERANCE >= config.index_drop_threshold {
            flags.push(DegradationFlag::IndexDropDetected);
        }
    }

    let average = mean(&index_values(samples)).unwrap_or(0.0);
    if average < config.low_density_threshold {
        flags.push(DegradationFlag::LowDensity);
    }

    let low_quality = samples.iter().filter(|s| s.quality == SampleQuality::Low).count();
    if low_quality as f64 / samples.len() as f64 > config.low_quality_fraction {
        flags.push(DegradationFlag::HighCloudCover);
    }

    if let Some(change) = cover_change_pct {
        if change < config.significant_decline_pct {
            flags.push(DegradationFlag::SignificantDecline);
        }
    }

    flags
}

/// Radar backscatter rescaled onto 0-100
pub fn radar_score(backscatter_db: f64) -> f64 {
    clamp_score((backscatter_db - RADAR_FLOOR_DB) / RADAR_SPAN_DB * 100.0)
}

/// Weighted health score in [0, 100]
///
/// A missing series borrows the other series' score for its slot. No
/// samples at all gives 0.
pub fn ecosystem_health_score(
    index_series: &[VegetationIndexSample],
    radar_series: &[RadarSample],
    flag_count: usize,
    flag_penalty: f64,
) -> f64 {
    let index_score =
        mean(&index_values(index_series)).map(|avg| clamp_score((avg + 1.0) / 2.0 * 100.0));
    let radar_values: Vec<f64> = radar_series.iter().map(|s| s.backscatter).collect();
    let radar = mean(&radar_values).map(radar_score);

    let (index_score, radar) = match (index_score, radar) {
        (None, None) => return 0.0,
        (Some(i), None) => (i, i),
        (None, Some(r)) => (r, r),
        (Some(i), Some(r)) => (i, r),
    };

    let blended = HEALTH_INDEX_WEIGHT * index_score + HEALTH_RADAR_WEIGHT * radar + HEALTH_BASE_POINTS;
    clamp_score(blended - flag_penalty * flag_count as f64)
}

/// Completeness = share of high-quality samples; cloud proxy = 100 - completeness
pub fn data_quality<I>(qualities: I) -> SatelliteDataQuality
where
    I: IntoIterator<Item = SampleQuality>,
{
    let (high, total) = qualities.into_iter().fold((0usize, 0usize), |(high, total), q| {
        (high + usize::from(q == SampleQuality::High), total + 1)
    });
    let completeness_pct = percentage(high, total);
    SatelliteDataQuality {
        cloud_cover_pct: clamp_score(100.0 - completeness_pct),
        completeness_pct,
    }
}
