//! Property tests: every score stays in range and every stage is a pure
//! function of its inputs

mod common;

use chrono::Duration;
use proptest::prelude::*;

use carbonguard_core::{
    readiness::{assess_spatial_coverage, SpatialConfig},
    satellite::{
        ecosystem_health_score, DataType, RadarSample, SampleQuality, SatelliteAnalyzer,
        SyntheticProvider, VegetationIndexSample,
    },
    sensor::{ReadingQuality, SensorAggregator, SensorReading, SensorType},
    AnomalyType, CrossSourceValidator, DetectedAnomaly, FixedClock, ReadinessAssessor,
    SeriesPoint, Severity, ValidationPipeline,
};

use common::scenarios::healthy_project;
use common::{day, mangrove_site, range};

fn quality_strategy() -> impl Strategy<Value = ReadingQuality> {
    prop_oneof![
        Just(ReadingQuality::Valid),
        Just(ReadingQuality::Questionable),
        Just(ReadingQuality::Bad),
    ]
}

fn sensor_type_strategy() -> impl Strategy<Value = SensorType> {
    prop::sample::select(SensorType::ALL.to_vec())
}

fn readings_strategy() -> impl Strategy<Value = Vec<(f64, ReadingQuality, f64)>> {
    prop::collection::vec((-1.0e6..1.0e6f64, quality_strategy(), -50.0..150.0f64), 0..60)
}

fn to_readings(raw: &[(f64, ReadingQuality, f64)]) -> Vec<SensorReading> {
    raw.iter()
        .enumerate()
        .map(|(i, (value, quality, confidence))| SensorReading {
            sensor_id: "prop-01".into(),
            timestamp: day(0) + Duration::hours(i as i64),
            value: *value,
            unit: "u".into(),
            quality: *quality,
            confidence: *confidence,
        })
        .collect()
}

fn in_score_range(x: f64) -> bool {
    (0.0..=100.0).contains(&x)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sensor_quality_in_range(raw in readings_strategy(), sensor_type in sensor_type_strategy()) {
        let readings = to_readings(&raw);
        let data = SensorAggregator::default()
            .aggregate("prop-01", &readings, mangrove_site().point, sensor_type)
            .unwrap();

        prop_assert_eq!(data.reading_count, readings.len());
        prop_assert!(in_score_range(data.data_quality));
        prop_assert!(in_score_range(data.mean_confidence));
        prop_assert_eq!(
            data.quality_counts.valid + data.quality_counts.questionable + data.quality_counts.bad,
            readings.len()
        );
    }

    #[test]
    fn prop_sensor_validation_in_range(raw in readings_strategy(), sensor_type in sensor_type_strategy()) {
        let readings = to_readings(&raw);
        let data = SensorAggregator::default()
            .aggregate("prop-01", &readings, mangrove_site().point, sensor_type)
            .unwrap();
        let pipeline = ValidationPipeline::with_clock(FixedClock::new(day(3)));

        let result = pipeline.validate_sensor(&data, sensor_type);
        prop_assert!(in_score_range(result.quality_score));
        prop_assert!(result.checks_passed <= result.checks_performed);
        if result.is_valid {
            prop_assert!(!result.has_critical_failures());
        }
        prop_assert_eq!(pipeline.validate_sensor(&data, sensor_type), result);
    }

    #[test]
    fn prop_health_score_in_range(
        index in prop::collection::vec(-1.0..=1.0f64, 0..20),
        radar in prop::collection::vec(-60.0..20.0f64, 0..20),
        flags in 0usize..6,
    ) {
        let index: Vec<_> = index
            .iter()
            .enumerate()
            .map(|(i, &value)| VegetationIndexSample {
                timestamp: day(i as i64 * 10),
                value,
                confidence: 90.0,
                quality: SampleQuality::High,
            })
            .collect();
        let radar: Vec<_> = radar
            .iter()
            .enumerate()
            .map(|(i, &backscatter)| RadarSample {
                timestamp: day(i as i64 * 12),
                backscatter,
                confidence: 85.0,
                quality: SampleQuality::High,
            })
            .collect();

        prop_assert!(in_score_range(ecosystem_health_score(&index, &radar, flags, 5.0)));
    }

    #[test]
    fn prop_satellite_analysis_in_range(seed in any::<u64>(), offset in -0.5..0.3f64, days in 0i64..120) {
        let provider = SyntheticProvider { seed, index_offset: offset, ..SyntheticProvider::default() };
        let analyzer = SatelliteAnalyzer::new(provider);
        let window = range(0, days);

        let result = analyzer.analyze(&mangrove_site(), &window, DataType::Combined).unwrap();
        prop_assert!(in_score_range(result.health_score));
        prop_assert!(result.biomass.estimated_biomass >= 0.0);
        prop_assert!(result.index_series.iter().all(|s| (-1.0..=1.0).contains(&s.value)));
        prop_assert_eq!(&analyzer.analyze(&mangrove_site(), &window, DataType::Combined).unwrap(), &result);

        let validation = ValidationPipeline::with_clock(FixedClock::new(day(days))).validate_satellite(&result);
        prop_assert!(in_score_range(validation.quality_score));
    }

    #[test]
    fn prop_cross_source_consistency_in_range(
        means in prop::collection::vec(-100.0..100.0f64, 0..8),
        lag_days in 0i64..40,
    ) {
        let satellite = SatelliteAnalyzer::new(SyntheticProvider::default())
            .analyze(&mangrove_site(), &range(0, 30), DataType::Combined)
            .unwrap();
        let aggregator = SensorAggregator::default();
        let sensors: Vec<_> = means
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let reading = SensorReading {
                    sensor_id: format!("s-{}", i),
                    timestamp: day(30 - lag_days),
                    value,
                    unit: "u".into(),
                    quality: ReadingQuality::Valid,
                    confidence: 90.0,
                };
                aggregator
                    .aggregate(&reading.sensor_id, &[reading.clone()], mangrove_site().point, SensorType::Co2Flux)
                    .unwrap()
            })
            .collect();

        let validation = CrossSourceValidator::default().compare(&satellite, &sensors);
        prop_assert!(in_score_range(validation.consistency_score));
        prop_assert_eq!(validation.sources_validated.len(), sensors.len() + 1);
        if validation.overall_valid {
            prop_assert!(validation.consistency_score >= 70.0);
        }
    }

    #[test]
    fn prop_spatial_coverage_bounded(sensors in 0usize..50, satellite in any::<bool>(), area in 0.1..1.0e5f64) {
        let info = assess_spatial_coverage(&mangrove_site(), area, sensors, satellite, &SpatialConfig::default());

        prop_assert!(in_score_range(info.coverage_pct));
        prop_assert!(info.uncovered_cells <= 25);
        prop_assert!(info.gaps.len() <= 3);
        prop_assert_eq!(info.gaps.is_empty(), info.uncovered_cells <= 5);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_readiness_bounded_and_idempotent(high in 0usize..3, medium in 0usize..3, hours_late in 0i64..400) {
        let mut scenario = healthy_project();
        for (i, severity) in std::iter::repeat(Severity::High)
            .take(high)
            .chain(std::iter::repeat(Severity::Medium).take(medium))
            .enumerate()
        {
            scenario.anomalies.push(DetectedAnomaly::new(
                SeriesPoint::new(day(i as i64), 1.0),
                0.8,
                AnomalyType::Outlier,
                severity,
                75.0,
                "synthetic",
            ));
        }
        let assessor = ReadinessAssessor::with_clock(FixedClock::new(day(30) + Duration::hours(hours_late)));

        let report = assessor.assess(&scenario.inputs()).unwrap();
        prop_assert!(in_score_range(report.readiness.readiness_score));
        prop_assert!(in_score_range(report.data_quality.overall_score));
        prop_assert_eq!(report.readiness.ready_for_verification, report.readiness.blockers.is_empty());
        prop_assert_eq!(report.readiness.criteria.no_unresolved_high_anomalies, high == 0);
        prop_assert_eq!(report.anomaly_count, high + medium);
        prop_assert_eq!(&assessor.assess(&scenario.inputs()).unwrap(), &report);
    }
}
