//! Property tests for detection and corroboration

mod common;

use proptest::prelude::*;

use carbonguard_ml::{corroborate, detect_anomalies, AnomalyModel, CorroborationConfig, SourceReport};

use common::{noisy, series};

fn models() -> impl Strategy<Value = AnomalyModel> {
    prop_oneof![
        Just(AnomalyModel::ZScore),
        Just(AnomalyModel::IsolationForest),
        Just(AnomalyModel::Arima),
        Just(AnomalyModel::Ensemble),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn detection_is_bounded_and_ranked(
        values in prop::collection::vec(-1000.0f64..1000.0, 0..80),
        model in models(),
    ) {
        let found = detect_anomalies(&series(&values), &model).unwrap();

        for a in &found {
            prop_assert!((0.0..=1.0).contains(&a.anomaly_score));
            prop_assert!((0.0..=100.0).contains(&a.confidence));
        }
        prop_assert!(found.windows(2).all(|w| w[0].anomaly_score >= w[1].anomaly_score));
        prop_assert_eq!(found.clone(), detect_anomalies(&series(&values), &model).unwrap());
    }

    #[test]
    fn corroboration_respects_floor_and_sources(seed in any::<u64>(), sources in 1usize..4) {
        let reports: Vec<SourceReport> = (0..sources)
            .map(|s| {
                let values = noisy(seed.wrapping_add(s as u64), 40, 5.0, 2.0);
                let found = detect_anomalies(&series(&values), &AnomalyModel::Ensemble).unwrap();
                SourceReport::new(format!("probe-{s}"), found)
            })
            .collect();
        let total: usize = reports.iter().map(|r| r.anomalies.len()).sum();
        let validated = corroborate(&reports, &CorroborationConfig::default());

        // Each report ends up in at most one group
        let grouped: usize = validated.iter().map(|v| v.sources.len()).sum();
        prop_assert!(grouped <= total);
        for v in &validated {
            prop_assert_eq!(v.corroborated, v.sources.len() >= 2);
            prop_assert!(v.corroborated || v.anomaly.confidence >= 60.0);
            let mut unique = v.sources.clone();
            unique.dedup();
            prop_assert_eq!(unique.len(), v.sources.len());
        }
    }
}
