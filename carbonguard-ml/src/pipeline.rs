//! End-to-end monitoring pipeline
//!
//! Wires the core stages and anomaly detection into one synchronous run:
//!
//! ```text
//! 1. satellite analysis ─┐
//! 2. sensor aggregation ─┼─► 3. anomaly detection per source ─► corroboration
//!                        ├─► 4. validation (satellite, each sensor)
//!                        └─► 5. cross-source comparison
//!                                          │
//!                                          ▼
//!                              6. aggregation and readiness
//! ```
//!
//! Stages never edit an earlier stage's output; the run returns every
//! intermediate result alongside the final report.

use carbonguard_core::satellite::{ObservationProvider, SatelliteAnalyzer};
use carbonguard_core::sensor::{SensorAggregator, SensorReading};
use carbonguard_core::{
    AggregatedMonitoringData, AggregatedSensorData, CrossSourceValidation, CrossSourceValidator,
    DataType, DataValidationResult, GeoPoint, MonitoringConfig, MonitoringError, ProjectMetadata,
    ReadinessAssessor, ReadinessInputs, SatelliteAnalysisResult, SensorType, SeriesPoint,
    SystemClock, TimeSource, ValidationPipeline,
};
use carbonguard_core::cross_source::SATELLITE_SOURCE;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corroboration::{corroborate, CorroborationConfig, SourceReport, ValidatedAnomaly};
use crate::ensemble::{AnomalyDetector, AnomalyModel, DetectionConfig};
use crate::DetectionResult;

/// Configuration of every stage of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub monitoring: MonitoringConfig,
    pub detection: DetectionConfig,
    pub corroboration: CorroborationConfig,
    pub model: AnomalyModel,
}

impl PipelineConfig {
    /// Parse a JSON document; stage limits are checked as for
    /// [`MonitoringConfig::from_json_str`]
    pub fn from_json_str(json: &str) -> DetectionResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MonitoringError::Config(e.to_string()))?;
        config.monitoring.validate()?;
        config.detection.validate()?;
        Ok(config)
    }
}

/// Readings of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorFeed {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    /// Device position; the project site when absent
    pub location: Option<GeoPoint>,
    pub readings: Vec<SensorReading>,
}

impl SensorFeed {
    pub fn new(sensor_id: impl Into<String>, sensor_type: SensorType, readings: Vec<SensorReading>) -> Self {
        Self { sensor_id: sensor_id.into(), sensor_type, location: None, readings }
    }
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInput {
    pub project: ProjectMetadata,
    #[serde(default)]
    pub data_type: DataType,
    pub sensors: Vec<SensorFeed>,
}

/// Results of every stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub satellite: SatelliteAnalysisResult,
    pub sensors: Vec<AggregatedSensorData>,
    pub satellite_validation: DataValidationResult,
    pub sensor_validations: Vec<DataValidationResult>,
    pub cross_source: CrossSourceValidation,
    pub anomalies: Vec<ValidatedAnomaly>,
    pub report: AggregatedMonitoringData,
}

/// Runs every stage for one project
pub struct MonitoringPipeline<P, C = SystemClock> {
    analyzer: SatelliteAnalyzer<P>,
    aggregator: SensorAggregator,
    detector: AnomalyDetector,
    validation: ValidationPipeline<C>,
    cross_source: CrossSourceValidator,
    assessor: ReadinessAssessor<C>,
    corroboration: CorroborationConfig,
    model: AnomalyModel,
}

impl<P: ObservationProvider> MonitoringPipeline<P, SystemClock> {
    pub fn new(provider: P) -> DetectionResult<Self> {
        Self::with_clock(provider, SystemClock, PipelineConfig::default())
    }
}

impl<P: ObservationProvider, C: TimeSource + Clone> MonitoringPipeline<P, C> {
    pub fn with_clock(provider: P, clock: C, config: PipelineConfig) -> DetectionResult<Self> {
        let PipelineConfig { monitoring, detection, corroboration, model } = config;
        monitoring.validate()?;
        Ok(Self {
            analyzer: SatelliteAnalyzer::with_config(provider, monitoring.satellite),
            aggregator: SensorAggregator::new(monitoring.sensor),
            detector: AnomalyDetector::new(detection)?,
            validation: ValidationPipeline::with_clock(clock.clone()).with_config(monitoring.validation),
            cross_source: CrossSourceValidator::new(monitoring.cross_source),
            assessor: ReadinessAssessor::with_clock(clock).with_config(monitoring.readiness),
            corroboration,
            model,
        })
    }

    /// Run stages 1 to 6.
    ///
    /// Fails on structurally invalid input only: a bad project, an
    /// inverted period or readings going backwards in time.
    pub fn run(&self, input: &PipelineInput) -> DetectionResult<PipelineReport> {
        let project = &input.project;
        project.validate()?;
        info!(
            "monitoring run for project {}: {} sensors, {:?}",
            project.project_id,
            input.sensors.len(),
            input.data_type
        );

        // 1-2
        let satellite = self.analyzer.analyze(&project.site, &project.monitoring_period, input.data_type)?;
        let sensors = input
            .sensors
            .iter()
            .map(|feed| {
                self.aggregator.aggregate(
                    &feed.sensor_id,
                    &feed.readings,
                    feed.location.unwrap_or(project.site.point),
                    feed.sensor_type,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        // 3
        let anomalies = self.detect(&satellite, &input.sensors)?;

        // 4-5
        let satellite_validation = self.validation.validate_satellite(&satellite);
        let sensor_validations: Vec<_> = sensors
            .iter()
            .map(|s| self.validation.validate_sensor(s, s.sensor_type))
            .collect();
        let cross_source = self.cross_source.compare(&satellite, &sensors);

        // 6
        let unresolved: Vec<_> = anomalies.iter().map(|v| v.anomaly.clone()).collect();
        let inputs = ReadinessInputs {
            project,
            satellite: Some(&satellite),
            sensors: &sensors,
            satellite_validation: Some(&satellite_validation),
            sensor_validations: &sensor_validations,
            cross_source: Some(&cross_source),
            anomalies: &unresolved,
        };
        let report = self.assessor.assess(&inputs)?;

        Ok(PipelineReport {
            satellite,
            sensors,
            satellite_validation,
            sensor_validations,
            cross_source,
            anomalies,
            report,
        })
    }

    fn detect(&self, satellite: &SatelliteAnalysisResult, feeds: &[SensorFeed]) -> DetectionResult<Vec<ValidatedAnomaly>> {
        let mut reports = Vec::with_capacity(feeds.len() + 1);

        let index: Vec<SeriesPoint> = satellite
            .index_series
            .iter()
            .map(|s| SeriesPoint::new(s.timestamp, s.value))
            .collect();
        reports.push(SourceReport::new(SATELLITE_SOURCE, self.detector.detect(&index, self.model)?));

        for feed in feeds {
            let series: Vec<SeriesPoint> =
                feed.readings.iter().map(|r| SeriesPoint::new(r.timestamp, r.value)).collect();
            reports.push(SourceReport::new(feed.sensor_id.clone(), self.detector.detect(&series, self.model)?));
        }

        let raw: usize = reports.iter().map(|r| r.anomalies.len()).sum();
        let validated = corroborate(&reports, &self.corroboration);
        debug!("anomaly detection: {} raw, {} validated", raw, validated.len());
        Ok(validated)
    }
}
