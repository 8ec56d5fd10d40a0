//! Cross-Source Consistency
//!
//! Compares a satellite analysis with the aggregated sensor data of the same
//! project and window. Each disagreement is recorded as a [`Discrepancy`] and
//! subtracts its penalty from a consistency score that starts at 100.
//!
//! ## Checks per sensor
//!
//! | Check              | Condition                                        | Severity | Penalty |
//! |--------------------|--------------------------------------------------|----------|---------|
//! | Health mismatch    | satellite health > 70 and sensor proxy < 5       | medium   | 15      |
//! | Temporal alignment | analysis date vs. window end differ by > 7 days  | low      | 5       |
//!
//! The sensor proxy is the sensor's mean value multiplied by a rescale factor
//! (20 by default) and clamped to [0, 100]. The factor is an uncalibrated
//! approximation and is exposed through [`CrossSourceConfig`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::anomaly::Severity;
use crate::constants::quality::*;
use crate::constants::time::ALIGNMENT_GAP_DAYS;
use crate::satellite::SatelliteAnalysisResult;
use crate::sensor::AggregatedSensorData;
use crate::stats::clamp_score;
use crate::time::days_between;

/// Source name used for the satellite in validation reports
pub const SATELLITE_SOURCE: &str = "satellite";

/// Tunables of the cross-source checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrossSourceConfig {
    /// Multiplier mapping a sensor mean onto the 0-100 health basis
    pub sensor_health_scale: f64,
    /// Proxy health below which a sensor contradicts a healthy satellite
    pub poor_proxy_health: f64,
    pub healthy_satellite_threshold: f64,
    pub health_penalty: f64,
    pub temporal_penalty: f64,
    pub alignment_gap_days: f64,
    pub valid_threshold: f64,
}

impl Default for CrossSourceConfig {
    fn default() -> Self {
        Self {
            sensor_health_scale: SENSOR_HEALTH_SCALE,
            poor_proxy_health: POOR_PROXY_HEALTH,
            healthy_satellite_threshold: HEALTHY_SATELLITE_THRESHOLD,
            health_penalty: HEALTH_DISCREPANCY_PENALTY,
            temporal_penalty: TEMPORAL_DISCREPANCY_PENALTY,
            alignment_gap_days: ALIGNMENT_GAP_DAYS,
            valid_threshold: CONSISTENCY_VALID_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    HealthMismatch,
    TemporalMisalignment,
}

/// One disagreement between the satellite and a sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub severity: Severity,
    pub sensor_id: String,
    pub description: String,
    /// Points subtracted from the consistency score
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSourceValidation {
    /// Satellite first, then every sensor that had readings
    pub sources_validated: Vec<String>,
    pub consistency_score: f64,
    pub discrepancies: Vec<Discrepancy>,
    pub overall_valid: bool,
    pub recommendations: Vec<String>,
}

impl CrossSourceValidation {
    pub fn has_high_severity(&self) -> bool {
        self.discrepancies.iter().any(|d| d.severity == Severity::High)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrossSourceValidator {
    config: CrossSourceConfig,
}

impl CrossSourceValidator {
    pub fn new(config: CrossSourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrossSourceConfig {
        &self.config
    }

    /// Proxy health of a sensor mean on the satellite's 0-100 basis
    pub fn proxy_health(&self, sensor_mean: f64) -> f64 {
        clamp_score(sensor_mean * self.config.sensor_health_scale)
    }

    /// Score how well the sensors agree with the satellite analysis
    pub fn compare(
        &self,
        satellite: &SatelliteAnalysisResult,
        sensors: &[AggregatedSensorData],
    ) -> CrossSourceValidation {
        let cfg = &self.config;
        let mut sources_validated = vec![SATELLITE_SOURCE.to_string()];
        let mut discrepancies = Vec::new();

        for sensor in sensors {
            let Some(window_end) = sensor.latest() else {
                warn!("cross-source: sensor {} has no readings, skipped", sensor.sensor_id);
                continue;
            };
            sources_validated.push(sensor.sensor_id.clone());

            let proxy = self.proxy_health(sensor.statistics.mean);
            if satellite.health_score > cfg.healthy_satellite_threshold && proxy < cfg.poor_proxy_health {
                discrepancies.push(Discrepancy {
                    kind: DiscrepancyKind::HealthMismatch,
                    severity: Severity::Medium,
                    sensor_id: sensor.sensor_id.clone(),
                    description: format!(
                        "Satellite health {:.1} but sensor {} implies {:.1}",
                        satellite.health_score, sensor.sensor_id, proxy
                    ),
                    penalty: cfg.health_penalty,
                });
            }

            let offset_days = days_between(satellite.analysis_date, window_end);
            if offset_days > cfg.alignment_gap_days {
                discrepancies.push(Discrepancy {
                    kind: DiscrepancyKind::TemporalMisalignment,
                    severity: Severity::Low,
                    sensor_id: sensor.sensor_id.clone(),
                    description: format!(
                        "Satellite analysis and sensor {} window end are {:.1} days apart",
                        sensor.sensor_id, offset_days
                    ),
                    penalty: cfg.temporal_penalty,
                });
            }
        }

        let consistency_score =
            clamp_score(CONSISTENCY_START - discrepancies.iter().map(|d| d.penalty).sum::<f64>());
        let has_high = discrepancies.iter().any(|d| d.severity == Severity::High);
        let overall_valid = consistency_score >= cfg.valid_threshold && !has_high;

        debug!(
            "cross-source: {} sources, {} discrepancies, consistency {:.1}",
            sources_validated.len(),
            discrepancies.len(),
            consistency_score
        );

        let recommendations = recommend(&discrepancies, overall_valid);
        CrossSourceValidation {
            sources_validated,
            consistency_score,
            discrepancies,
            overall_valid,
            recommendations,
        }
    }
}

fn recommend(discrepancies: &[Discrepancy], overall_valid: bool) -> Vec<String> {
    let mut out = Vec::new();
    for d in discrepancies {
        match d.kind {
            DiscrepancyKind::HealthMismatch => out.push(format!(
                "Field-verify sensor {} against the satellite health signal",
                d.sensor_id
            )),
            DiscrepancyKind::TemporalMisalignment => out.push(format!(
                "Align the acquisition schedule of sensor {} with satellite passes",
                d.sensor_id
            )),
        }
    }
    if !overall_valid {
        out.push("Sources disagree; hold verification until discrepancies are resolved".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{EcosystemType, GeoPoint, SiteLocation};
    use crate::satellite::{BiomassEstimate, BiomassMethod, DataType, SatelliteDataQuality};
    use crate::sensor::{ReadingQuality, SensorAggregator, SensorReading, SensorType};
    use crate::time::DateRange;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn satellite(health: f64) -> SatelliteAnalysisResult {
        SatelliteAnalysisResult {
            location: SiteLocation::new(1.0, 103.8, EcosystemType::Mangrove),
            date_range: DateRange::new(t(0), t(30)).unwrap(),
            data_type: DataType::Combined,
            analysis_date: t(30),
            index_series: vec![],
            radar_series: vec![],
            biomass: BiomassEstimate {
                estimated_biomass: 2.0,
                method: BiomassMethod::Allometric,
                confidence: 80.0,
                last_updated: t(30),
            },
            vegetation_cover_change_pct: None,
            degradation_flags: vec![],
            health_score: health,
            data_quality: SatelliteDataQuality { cloud_cover_pct: 10.0, completeness_pct: 90.0 },
        }
    }

    fn sensor(id: &str, end_day: i64, value: f64) -> AggregatedSensorData {
        let readings: Vec<_> = (0..3)
            .map(|i| SensorReading {
                sensor_id: id.into(),
                timestamp: t(end_day) - Duration::hours(2 - i),
                value,
                unit: "µmol/m²/s".into(),
                quality: ReadingQuality::Valid,
                confidence: 90.0,
            })
            .collect();
        SensorAggregator::default()
            .aggregate(id, &readings, GeoPoint::new(1.0, 103.8), SensorType::Co2Flux)
            .unwrap()
    }

    #[test]
    fn consistent_sources_keep_full_score() {
        let result = CrossSourceValidator::default().compare(&satellite(80.0), &[sensor("co2-1", 29, 4.0)]);
        assert_eq!(result.consistency_score, 100.0);
        assert!(result.overall_valid);
        assert_eq!(result.sources_validated, vec!["satellite", "co2-1"]);
    }

    #[test]
    fn health_mismatch_and_misalignment_are_penalized() {
        let sensors = [sensor("co2-1", 30, 0.1), sensor("co2-2", 15, 4.0)];
        let result = CrossSourceValidator::default().compare(&satellite(80.0), &sensors);

        assert_eq!(result.discrepancies.len(), 2);
        assert_eq!(result.discrepancies[0].kind, DiscrepancyKind::HealthMismatch);
        assert_eq!(result.discrepancies[0].severity, Severity::Medium);
        assert_eq!(result.discrepancies[1].kind, DiscrepancyKind::TemporalMisalignment);
        assert_eq!(result.discrepancies[1].severity, Severity::Low);
        assert_eq!(result.consistency_score, 80.0);
        assert!(result.overall_valid);
    }

    #[test]
    fn unhealthy_satellite_skips_health_check() {
        let result = CrossSourceValidator::default().compare(&satellite(60.0), &[sensor("co2-1", 30, 0.1)]);
        assert!(result.discrepancies.is_empty());
    }

    #[test]
    fn rescale_factor_is_configurable() {
        let validator = CrossSourceValidator::new(CrossSourceConfig {
            sensor_health_scale: 100.0,
            ..Default::default()
        });
        let result = validator.compare(&satellite(80.0), &[sensor("co2-1", 30, 0.1)]);
        assert!(result.discrepancies.is_empty());
    }

    #[test]
    fn score_clamps_and_invalidates() {
        let sensors: Vec<_> = (0..8).map(|i| sensor(&format!("co2-{}", i), 10, 0.0)).collect();
        let result = CrossSourceValidator::default().compare(&satellite(90.0), &sensors);
        assert_eq!(result.consistency_score, 0.0);
        assert!(!result.overall_valid);
        assert!(result.recommendations.last().unwrap().starts_with("Sources disagree"));
    }

    #[test]
    fn sensors_without_readings_are_skipped() {
        let empty = SensorAggregator::default()
            .aggregate("co2-x", &[], GeoPoint::new(0.0, 0.0), SensorType::Co2Flux)
            .unwrap();
        let result = CrossSourceValidator::default().compare(&satellite(90.0), &[empty]);
        assert_eq!(result.sources_validated, vec!["satellite"]);
        assert_eq!(result.consistency_score, 100.0);
    }
}
