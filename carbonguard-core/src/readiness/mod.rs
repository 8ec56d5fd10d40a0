//! Aggregation and Verification Readiness
//!
//! ## Overview
//!
//! The last stage joins every upstream result for one project into an
//! [`AggregatedMonitoringData`] report:
//!
//! 1. Temporal alignment of all source timestamps
//! 2. Spatial coverage over a 25-cell reference grid
//! 3. Carbon sequestration estimate
//! 4. Combined data quality and freshness
//! 5. Readiness verdict with blockers and next steps
//! 6. Recommendations
//!
//! ## Readiness Criteria
//!
//! All five must hold for `ready_for_verification`:
//!
//! | Criterion                     | Holds when                                 |
//! |-------------------------------|--------------------------------------------|
//! | sufficient data sources       | satellite observations and sensor readings |
//! | temporal coverage adequate    | aligned and coverage >= 80%                |
//! | quality threshold met         | overall quality >= 70                      |
//! | no unresolved high anomalies  | no high-severity anomaly supplied          |
//! | cross-source consistent       | consistency score >= 70                    |
//!
//! The score is the share of criteria met. Data-starved inputs never error;
//! they produce a report that is not ready, with explicit blockers.

mod carbon;
mod quality;
mod spatial;
mod temporal;

pub use carbon::{estimate_sequestration, CarbonConfig, CarbonSequestrationEstimate, EstimateMethod};
pub use quality::{DataQualityMetrics, Freshness};
pub use spatial::{assess_spatial_coverage, GapPriority, SpatialConfig, SpatialCoverageInfo, SpatialGap};
pub use temporal::{
    assess_temporal_alignment, AlignmentConfig, SourceTimeline, TemporalAlignmentInfo, TemporalGap,
};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::anomaly::DetectedAnomaly;
use crate::constants::quality::CONSISTENCY_VALID_THRESHOLD;
use crate::constants::readiness::{READINESS_CRITERIA, READINESS_THRESHOLD};
use crate::cross_source::{CrossSourceValidation, SATELLITE_SOURCE};
use crate::errors::{MonitoringError, MonitoringResult};
use crate::location::SiteLocation;
use crate::satellite::{DegradationFlag, SatelliteAnalysisResult};
use crate::sensor::{AggregatedSensorData, SensorType};
use crate::stats::{clamp_score, mean, percentage};
use crate::time::{DateRange, SystemClock, TimeSource};
use crate::validation::{DataValidationResult, RecommendedAction};

/// Project a readiness report is produced for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub project_id: String,
    pub name: String,
    pub site: SiteLocation,
    pub area_ha: f64,
    pub monitoring_period: DateRange,
}

impl ProjectMetadata {
    /// Validated constructor; the area must be positive and finite
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        site: SiteLocation,
        area_ha: f64,
        monitoring_period: DateRange,
    ) -> MonitoringResult<Self> {
        let project = Self {
            project_id: project_id.into(),
            name: name.into(),
            site,
            area_ha,
            monitoring_period,
        };
        project.validate()?;
        Ok(project)
    }

    /// Re-check a deserialized project
    pub fn validate(&self) -> MonitoringResult<()> {
        if !self.area_ha.is_finite() || self.area_ha <= 0.0 {
            return Err(MonitoringError::NegativeArea { area: self.area_ha });
        }
        self.site.point.validate()?;
        DateRange::new(self.monitoring_period.start, self.monitoring_period.end)?;
        Ok(())
    }
}

/// Everything the assessor joins, borrowed from earlier stages
#[derive(Debug, Clone, Copy)]
pub struct ReadinessInputs<'a> {
    pub project: &'a ProjectMetadata,
    pub satellite: Option<&'a SatelliteAnalysisResult>,
    pub sensors: &'a [AggregatedSensorData],
    pub satellite_validation: Option<&'a DataValidationResult>,
    pub sensor_validations: &'a [DataValidationResult],
    pub cross_source: Option<&'a CrossSourceValidation>,
    /// Every anomaly passed in counts as unresolved
    pub anomalies: &'a [DetectedAnomaly],
}

impl<'a> ReadinessInputs<'a> {
    /// Inputs with no evidence attached yet
    pub fn new(project: &'a ProjectMetadata) -> Self {
        Self {
            project,
            satellite: None,
            sensors: &[],
            satellite_validation: None,
            sensor_validations: &[],
            cross_source: None,
            anomalies: &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadinessConfig {
    pub quality_threshold: f64,
    pub consistency_threshold: f64,
    pub alignment: AlignmentConfig,
    pub spatial: SpatialConfig,
    pub carbon: CarbonConfig,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            quality_threshold: READINESS_THRESHOLD,
            consistency_threshold: CONSISTENCY_VALID_THRESHOLD,
            alignment: AlignmentConfig::default(),
            spatial: SpatialConfig::default(),
            carbon: CarbonConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessCriteria {
    pub sufficient_data_sources: bool,
    pub temporal_coverage_adequate: bool,
    pub quality_threshold_met: bool,
    pub no_unresolved_high_anomalies: bool,
    pub cross_source_consistent: bool,
}

impl ReadinessCriteria {
    pub fn met(&self) -> usize {
        [
            self.sufficient_data_sources,
            self.temporal_coverage_adequate,
            self.quality_threshold_met,
            self.no_unresolved_high_anomalies,
            self.cross_source_consistent,
        ]
        .iter()
        .filter(|c| **c)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReadiness {
    pub ready_for_verification: bool,
    /// Percentage of criteria met
    pub readiness_score: f64,
    pub criteria: ReadinessCriteria,
    pub blockers: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteSummary {
    pub health_score: f64,
    pub estimated_biomass: f64,
    pub index_samples: usize,
    pub radar_samples: usize,
    pub degradation_flags: Vec<DegradationFlag>,
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSummary {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub reading_count: usize,
    pub mean_value: f64,
    pub data_quality: f64,
    pub flagged_readings: usize,
}

/// Final report of one readiness run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMonitoringData {
    pub project_id: String,
    pub monitoring_period: DateRange,
    pub generated_at: DateTime<Utc>,
    pub satellite: Option<SatelliteSummary>,
    pub sensors: Vec<SensorSummary>,
    pub anomaly_count: usize,
    pub temporal_alignment: TemporalAlignmentInfo,
    pub spatial_coverage: SpatialCoverageInfo,
    pub carbon_estimate: CarbonSequestrationEstimate,
    pub data_quality: DataQualityMetrics,
    pub readiness: VerificationReadiness,
    pub recommendations: Vec<Recommendation>,
}

/// Joins upstream results into the readiness report
#[derive(Debug, Clone, Default)]
pub struct ReadinessAssessor<C = SystemClock> {
    clock: C,
    config: ReadinessConfig,
}

impl ReadinessAssessor<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: TimeSource> ReadinessAssessor<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock, config: ReadinessConfig::default() }
    }

    pub fn with_config(mut self, config: ReadinessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Build the report.
    ///
    /// Fails only when the project metadata itself is invalid.
    pub fn assess(&self, inputs: &ReadinessInputs<'_>) -> MonitoringResult<AggregatedMonitoringData> {
        let project = inputs.project;
        project.validate()?;
        let now = self.clock.now();

        let satellite = inputs.satellite.filter(|s| s.has_observations());
        let sensors: Vec<&AggregatedSensorData> = inputs.sensors.iter().filter(|s| s.has_readings()).collect();

        let satellite_times = satellite.map(|s| s.timestamps()).unwrap_or_default();
        let mut timelines = Vec::with_capacity(sensors.len() + 1);
        if !satellite_times.is_empty() {
            timelines.push(SourceTimeline::new(SATELLITE_SOURCE, &satellite_times));
        }
        timelines.extend(sensors.iter().map(|s| SourceTimeline::new(&s.sensor_id, &s.timestamps)));

        let temporal = assess_temporal_alignment(&project.monitoring_period, &timelines, &self.config.alignment);
        let spatial = assess_spatial_coverage(
            &project.site,
            project.area_ha,
            sensors.len(),
            satellite.is_some(),
            &self.config.spatial,
        );
        let carbon = estimate_sequestration(
            satellite.map(|s| &s.biomass),
            project.area_ha,
            project.monitoring_period.days(),
            &self.config.carbon,
        );

        let satellite_quality = match (inputs.satellite_validation, satellite) {
            (Some(v), Some(_)) => v.quality_score,
            (None, Some(s)) => s.data_quality.completeness_pct,
            (_, None) => 0.0,
        };
        let sensor_qualities: Vec<f64> = sensors.iter().map(|s| s.data_quality).collect();
        let latest_observation = timelines.iter().flat_map(|t| t.timestamps.iter().copied()).max();
        let quality = DataQualityMetrics::new(
            satellite_quality,
            mean(&sensor_qualities).unwrap_or(0.0),
            temporal.coverage_pct,
            spatial.coverage_pct,
            latest_observation,
            now,
        );

        let criteria = ReadinessCriteria {
            sufficient_data_sources: satellite.is_some() && !sensors.is_empty(),
            temporal_coverage_adequate: temporal.aligned
                && temporal.coverage_pct >= self.config.alignment.min_coverage_pct,
            quality_threshold_met: quality.overall_score >= self.config.quality_threshold,
            no_unresolved_high_anomalies: !inputs.anomalies.iter().any(|a| a.is_high_severity()),
            cross_source_consistent: inputs
                .cross_source
                .map_or(false, |c| c.consistency_score >= self.config.consistency_threshold),
        };
        let readiness = self.verdict(&criteria, &temporal, &quality, inputs);
        let recommendations = self.recommend(&readiness, &temporal, &spatial, &quality, inputs);

        info!(
            "project {}: readiness {:.0}% ({}), {} blockers",
            project.project_id,
            readiness.readiness_score,
            if readiness.ready_for_verification { "ready" } else { "not ready" },
            readiness.blockers.len()
        );

        Ok(AggregatedMonitoringData {
            project_id: project.project_id.clone(),
            monitoring_period: project.monitoring_period,
            generated_at: now,
            satellite: inputs.satellite.map(|s| SatelliteSummary {
                health_score: s.health_score,
                estimated_biomass: s.biomass.estimated_biomass,
                index_samples: s.index_series.len(),
                radar_samples: s.radar_series.len(),
                degradation_flags: s.degradation_flags.clone(),
                quality_score: inputs.satellite_validation.map(|v| v.quality_score),
            }),
            sensors: inputs
                .sensors
                .iter()
                .map(|s| SensorSummary {
                    sensor_id: s.sensor_id.clone(),
                    sensor_type: s.sensor_type,
                    reading_count: s.reading_count,
                    mean_value: s.statistics.mean,
                    data_quality: s.data_quality,
                    flagged_readings: s.anomaly_flags.len(),
                })
                .collect(),
            anomaly_count: inputs.anomalies.len(),
            temporal_alignment: temporal,
            spatial_coverage: spatial,
            carbon_estimate: carbon,
            data_quality: quality,
            readiness,
            recommendations,
        })
    }

    fn verdict(
        &self,
        criteria: &ReadinessCriteria,
        temporal: &TemporalAlignmentInfo,
        quality: &DataQualityMetrics,
        inputs: &ReadinessInputs<'_>,
    ) -> VerificationReadiness {
        let mut blockers = Vec::new();
        let mut next_steps = Vec::new();

        if criteria.sufficient_data_sources {
            next_steps.push("Data sources: satellite and sensor evidence present".to_string());
        } else {
            blockers.push("Insufficient data sources: both satellite observations and sensor readings are required".to_string());
        }

        if criteria.temporal_coverage_adequate {
            next_steps.push(format!("Temporal coverage: {:.1}% and aligned", temporal.coverage_pct));
        } else {
            blockers.push(format!(
                "Temporal coverage inadequate: {:.1}% with {} gaps (need {}% and aligned sources)",
                temporal.coverage_pct,
                temporal.gaps.len(),
                self.config.alignment.min_coverage_pct
            ));
        }

        if criteria.quality_threshold_met {
            next_steps.push(format!("Data quality: {:.1} meets threshold", quality.overall_score));
        } else {
            blockers.push(format!(
                "Data quality {:.1} below threshold {}",
                quality.overall_score, self.config.quality_threshold
            ));
        }

        if criteria.no_unresolved_high_anomalies {
            next_steps.push("Anomalies: no unresolved high-severity anomalies".to_string());
        } else {
            let high = inputs.anomalies.iter().filter(|a| a.is_high_severity()).count();
            blockers.push(format!("{} unresolved high-severity anomalies", high));
        }

        if criteria.cross_source_consistent {
            next_steps.push("Cross-source consistency confirmed".to_string());
        } else {
            match inputs.cross_source {
                Some(c) => blockers.push(format!(
                    "Cross-source consistency {:.1} below {}",
                    c.consistency_score, self.config.consistency_threshold
                )),
                None => blockers.push("Cross-source validation has not been run".to_string()),
            }
        }

        let ready = blockers.is_empty();
        if ready {
            next_steps.push("Ready for verification: submit the monitoring report to the verifier".to_string());
        }
        debug!("readiness criteria {:?}", criteria);

        VerificationReadiness {
            ready_for_verification: ready,
            readiness_score: clamp_score(percentage(criteria.met(), READINESS_CRITERIA)),
            criteria: *criteria,
            blockers,
            next_steps,
        }
    }

    fn recommend(
        &self,
        readiness: &VerificationReadiness,
        temporal: &TemporalAlignmentInfo,
        spatial: &SpatialCoverageInfo,
        quality: &DataQualityMetrics,
        inputs: &ReadinessInputs<'_>,
    ) -> Vec<Recommendation> {
        let mut out = Vec::new();

        if let Some(first) = readiness.blockers.first() {
            out.push(Recommendation {
                priority: Priority::Critical,
                action: "Resolve verification blockers".to_string(),
                reason: first.clone(),
            });
        }
        if quality.overall_score < self.config.quality_threshold {
            out.push(Recommendation {
                priority: Priority::High,
                action: "Re-acquire satellite imagery and recalibrate sensors".to_string(),
                reason: format!("Overall data quality is {:.1}", quality.overall_score),
            });
        }
        if temporal.coverage_pct < self.config.alignment.min_coverage_pct {
            out.push(Recommendation {
                priority: Priority::High,
                action: "Fill temporal gaps with additional acquisitions".to_string(),
                reason: format!(
                    "Temporal coverage is {:.1}% across {} gaps",
                    temporal.coverage_pct,
                    temporal.gaps.len()
                ),
            });
        }
        if !spatial.is_adequate(&self.config.spatial) {
            out.push(Recommendation {
                priority: Priority::Medium,
                action: "Deploy additional sensors in uncovered grid cells".to_string(),
                reason: format!(
                    "Spatial coverage is {:.1}% with {} uncovered cells",
                    spatial.coverage_pct, spatial.uncovered_cells
                ),
            });
        }
        let rejected = inputs
            .sensor_validations
            .iter()
            .chain(inputs.satellite_validation)
            .filter(|v| v.recommended_action == RecommendedAction::Reject)
            .count();
        if rejected > 0 {
            out.push(Recommendation {
                priority: Priority::Medium,
                action: "Replace or re-collect rejected data sources".to_string(),
                reason: format!("{} sources were rejected by validation", rejected),
            });
        }
        if quality.freshness == Freshness::Stale {
            out.push(Recommendation {
                priority: Priority::Low,
                action: "Refresh monitoring data".to_string(),
                reason: "Newest observation is more than a week old".to_string(),
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::EcosystemType;
    use crate::time::FixedClock;
    use chrono::{Duration, TimeZone};

    fn t(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn project(days: i64) -> ProjectMetadata {
        ProjectMetadata::new(
            "proj-1",
            "Bay mangroves",
            SiteLocation::new(-2.5, 140.7, EcosystemType::Mangrove),
            250.0,
            DateRange::new(t(0), t(days)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_non_positive_area() {
        let site = SiteLocation::new(0.0, 0.0, EcosystemType::Seagrass);
        let range = DateRange::new(t(0), t(1)).unwrap();
        for area in [0.0, -5.0, f64::NAN] {
            let err = ProjectMetadata::new("p", "p", site, area, range).unwrap_err();
            assert!(matches!(err, MonitoringError::NegativeArea { .. }));
        }
    }

    #[test]
    fn no_evidence_renders_non_ready_report() {
        let project = project(30);
        let assessor = ReadinessAssessor::with_clock(FixedClock::new(t(31)));
        let report = assessor.assess(&ReadinessInputs::new(&project)).unwrap();

        assert!(!report.readiness.ready_for_verification);
        assert!(!report.readiness.criteria.sufficient_data_sources);
        assert_eq!(report.readiness.readiness_score, 20.0);
        assert_eq!(report.carbon_estimate.method, EstimateMethod::Baseline);
        assert_eq!(report.recommendations[0].priority, Priority::Critical);
        assert_eq!(report.recommendations[0].reason, report.readiness.blockers[0]);
        assert_eq!(report.data_quality.freshness, Freshness::Stale);
    }

    #[test]
    fn criteria_count_is_five() {
        let all = ReadinessCriteria {
            sufficient_data_sources: true,
            temporal_coverage_adequate: true,
            quality_threshold_met: true,
            no_unresolved_high_anomalies: true,
            cross_source_consistent: false,
        };
        assert_eq!(all.met(), 4);
        assert_eq!(percentage(all.met(), READINESS_CRITERIA), 80.0);
    }
}
