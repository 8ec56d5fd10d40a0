//! Pre-built project scenarios running every core stage
//!
//! Each scenario owns its stage outputs so tests can borrow them into
//! `ReadinessInputs` and vary one piece at a time.

use carbonguard_core::{
    cross_source::CrossSourceValidator,
    satellite::{DataType, SatelliteAnalyzer, SyntheticProvider},
    sensor::{SensorAggregator, SensorType},
    AggregatedSensorData, CrossSourceValidation, DataValidationResult, DetectedAnomaly,
    FixedClock, ProjectMetadata, ReadinessInputs, SatelliteAnalysisResult, ValidationPipeline,
};

use super::generators::ReadingGenerator;
use super::{clock_after, day, project};

pub struct Scenario {
    pub project: ProjectMetadata,
    pub clock: FixedClock,
    pub satellite: Option<SatelliteAnalysisResult>,
    pub sensors: Vec<AggregatedSensorData>,
    pub satellite_validation: Option<DataValidationResult>,
    pub sensor_validations: Vec<DataValidationResult>,
    pub cross_source: Option<CrossSourceValidation>,
    pub anomalies: Vec<DetectedAnomaly>,
}

impl Scenario {
    pub fn inputs(&self) -> ReadinessInputs<'_> {
        ReadinessInputs {
            project: &self.project,
            satellite: self.satellite.as_ref(),
            sensors: &self.sensors,
            satellite_validation: self.satellite_validation.as_ref(),
            sensor_validations: &self.sensor_validations,
            cross_source: self.cross_source.as_ref(),
            anomalies: &self.anomalies,
        }
    }
}

const DEPLOYMENT: [(&str, SensorType, f64); 4] = [
    ("do-01", SensorType::DissolvedOxygen, 6.5),
    ("temp-01", SensorType::Temperature, 28.0),
    ("sal-01", SensorType::Salinity, 30.0),
    ("ph-01", SensorType::Ph, 7.8),
];

/// 30-day mangrove project with synthetic satellite data and four sensors
/// reporting every six hours
pub fn healthy_project() -> Scenario {
    let project = project(0, 30);
    let clock = clock_after(30, 2);

    let analyzer = SatelliteAnalyzer::new(SyntheticProvider::default());
    let satellite = analyzer
        .analyze(&project.site, &project.monitoring_period, DataType::Combined)
        .unwrap();

    let aggregator = SensorAggregator::default();
    let sensors: Vec<_> = DEPLOYMENT
        .iter()
        .map(|(id, sensor_type, base)| {
            let readings = ReadingGenerator::new(id, *sensor_type, *base).every(day(0), day(30), 6);
            aggregator
                .aggregate(id, &readings, project.site.point, *sensor_type)
                .unwrap()
        })
        .collect();

    let validation = ValidationPipeline::with_clock(clock);
    let satellite_validation = validation.validate_satellite(&satellite);
    let sensor_validations = sensors
        .iter()
        .map(|s| validation.validate_sensor(s, s.sensor_type))
        .collect();
    let cross_source = CrossSourceValidator::default().compare(&satellite, &sensors);

    Scenario {
        project,
        clock,
        satellite: Some(satellite),
        sensors,
        satellite_validation: Some(satellite_validation),
        sensor_validations,
        cross_source: Some(cross_source),
        anomalies: Vec::new(),
    }
}

/// One-day project with a single index sample and no sensors
pub fn data_starved_project() -> Scenario {
    let project = project(0, 1);
    let clock = clock_after(1, 1);

    let satellite = SatelliteAnalyzer::new(SyntheticProvider::default())
        .analyze(&project.site, &project.monitoring_period, DataType::VegetationIndex)
        .unwrap();
    let satellite_validation = ValidationPipeline::with_clock(clock).validate_satellite(&satellite);
    let cross_source = CrossSourceValidator::default().compare(&satellite, &[]);

    Scenario {
        project,
        clock,
        satellite: Some(satellite),
        sensors: Vec::new(),
        satellite_validation: Some(satellite_validation),
        sensor_validations: Vec::new(),
        cross_source: Some(cross_source),
        anomalies: Vec::new(),
    }
}
