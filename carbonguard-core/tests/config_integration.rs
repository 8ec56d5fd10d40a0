//! Configuration file loading and its effect on the stages

mod common;

use std::fs;

use carbonguard_core::{
    cross_source::CrossSourceValidator, MonitoringConfig, MonitoringError, ReadinessAssessor,
    ValidationPipeline,
};

use common::scenarios::healthy_project;

#[test]
fn loads_partial_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitoring.json");
    fs::write(
        &path,
        r#"{
            "satellite": { "indexCadenceDays": 5 },
            "crossSource": { "sensorHealthScale": 0.1 },
            "readiness": { "qualityThreshold": 95.0 }
        }"#,
    )
    .unwrap();

    let config = MonitoringConfig::from_path(&path).unwrap();
    assert_eq!(config.satellite.index_cadence_days, 5);
    assert_eq!(config.satellite.radar_cadence_days, 12);
    assert_eq!(config.cross_source.sensor_health_scale, 0.1);
    assert_eq!(config.readiness.quality_threshold, 95.0);
    assert_eq!(config.validation, MonitoringConfig::default().validation);
}

#[test]
fn written_config_reads_back_equal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defaults.json");
    let mut config = MonitoringConfig::default();
    config.sensor.outlier_sigma = 2.5;

    fs::write(&path, config.to_json_string().unwrap()).unwrap();
    assert_eq!(MonitoringConfig::from_path(&path).unwrap(), config);
}

#[test]
fn invalid_file_reports_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"satellite\": { \"indexCadenceDays\": \"ten\" } }").unwrap();

    let err = MonitoringConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, MonitoringError::Config(_)));
}

#[test]
fn loaded_thresholds_drive_the_stages() {
    let config = MonitoringConfig::from_json_str(
        r#"{
            "crossSource": { "sensorHealthScale": 0.1 },
            "readiness": { "qualityThreshold": 99.5 }
        }"#,
    )
    .unwrap();
    let scenario = healthy_project();
    let satellite = scenario.satellite.as_ref().unwrap();

    let cross_source = CrossSourceValidator::new(config.cross_source.clone()).compare(satellite, &scenario.sensors);
    assert!(!cross_source.overall_valid);

    let validation = ValidationPipeline::with_clock(scenario.clock).with_config(config.validation.clone());
    assert!(validation.validate_satellite(satellite).is_valid);

    let report = ReadinessAssessor::with_clock(scenario.clock)
        .with_config(config.readiness.clone())
        .assess(&scenario.inputs())
        .unwrap();
    assert!(!report.readiness.criteria.quality_threshold_met);
    assert!(!report.readiness.ready_for_verification);
}
