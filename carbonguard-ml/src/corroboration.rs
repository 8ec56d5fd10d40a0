//! Cross-source corroboration of anomalies
//!
//! Sources report anomalies independently. Reports from different sources
//! that sit within a time window of each other and agree on the value
//! within a relative tolerance describe the same event.
//!
//! Grouping is greedy and deterministic: reports are visited in source
//! order, then in each source's own order. An unclaimed report seeds a
//! group and takes, from every later source, the first unclaimed report
//! that matches the seed. Each source contributes at most one report per
//! group.
//!
//! | Group size | Confidence                  | Action         | Kept when              |
//! |------------|-----------------------------|----------------|------------------------|
//! | >= 2       | mean of the group           | escalated once | always                 |
//! | 1          | the report's own confidence | unchanged      | confidence >= 60       |

use carbonguard_core::constants::quality::{
    CORROBORATION_CONFIDENCE_FLOOR, CORROBORATION_VALUE_TOLERANCE, MIN_CORROBORATING_SOURCES,
};
use carbonguard_core::constants::time::CORROBORATION_WINDOW_SECONDS;
use carbonguard_core::constants::EPSILON;
use carbonguard_core::stats::{clamp_score, mean};
use carbonguard_core::DetectedAnomaly;
use log::debug;
use serde::{Deserialize, Serialize};

/// Anomalies one source reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    pub anomalies: Vec<DetectedAnomaly>,
}

impl SourceReport {
    pub fn new(source: impl Into<String>, anomalies: Vec<DetectedAnomaly>) -> Self {
        Self { source: source.into(), anomalies }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorroborationConfig {
    pub window_seconds: i64,
    /// Largest relative value difference between matching reports
    pub value_tolerance: f64,
    pub min_sources: usize,
    /// Confidence an uncorroborated report needs to be kept
    pub confidence_floor: f64,
}

impl Default for CorroborationConfig {
    fn default() -> Self {
        Self {
            window_seconds: CORROBORATION_WINDOW_SECONDS,
            value_tolerance: CORROBORATION_VALUE_TOLERANCE,
            min_sources: MIN_CORROBORATING_SOURCES,
            confidence_floor: CORROBORATION_CONFIDENCE_FLOOR,
        }
    }
}

impl CorroborationConfig {
    fn matches(&self, a: &DetectedAnomaly, b: &DetectedAnomaly) -> bool {
        let apart = (a.timestamp - b.timestamp).num_seconds().abs();
        let scale = a.value.abs().max(b.value.abs()) + EPSILON;
        apart <= self.window_seconds && (a.value - b.value).abs() / scale <= self.value_tolerance
    }
}

/// An anomaly that survived corroboration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedAnomaly {
    /// The seed report, with confidence and action updated for its group
    pub anomaly: DetectedAnomaly,
    /// Sources in the group, seed first
    pub sources: Vec<String>,
    pub corroborated: bool,
}

/// Group reports across sources and keep the validated set
pub fn corroborate(reports: &[SourceReport], config: &CorroborationConfig) -> Vec<ValidatedAnomaly> {
    let mut claimed: Vec<Vec<bool>> = reports.iter().map(|r| vec![false; r.anomalies.len()]).collect();
    let mut validated = Vec::new();
    let mut dropped = 0usize;

    for (s, report) in reports.iter().enumerate() {
        for (i, seed) in report.anomalies.iter().enumerate() {
            if claimed[s][i] {
                continue;
            }
            claimed[s][i] = true;

            let mut members = vec![(s, seed)];
            for (o, other) in reports.iter().enumerate().skip(s + 1) {
                let found = other
                    .anomalies
                    .iter()
                    .enumerate()
                    .find(|(j, candidate)| !claimed[o][*j] && config.matches(seed, candidate));
                if let Some((j, candidate)) = found {
                    claimed[o][j] = true;
                    members.push((o, candidate));
                }
            }

            let corroborated = members.len() >= config.min_sources.max(2);
            let mut anomaly = seed.clone();
            if corroborated {
                let confidences: Vec<f64> = members.iter().map(|(_, a)| a.confidence).collect();
                anomaly.confidence = clamp_score(mean(&confidences).unwrap_or(seed.confidence));
                anomaly.suggested_action = anomaly.suggested_action.escalate();
            } else if seed.confidence < config.confidence_floor {
                dropped += 1;
                continue;
            }

            validated.push(ValidatedAnomaly {
                anomaly,
                sources: members.iter().map(|(m, _)| reports[*m].source.clone()).collect(),
                corroborated,
            });
        }
    }

    debug!(
        "corroboration: {} sources, {} validated, {} dropped",
        reports.len(),
        validated.len(),
        dropped
    );
    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonguard_core::{AnomalyType, SeriesPoint, Severity, SuggestedAction};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn report(minutes: i64, value: f64, confidence: f64) -> DetectedAnomaly {
        DetectedAnomaly::new(
            SeriesPoint::new(at(minutes), value),
            0.7,
            AnomalyType::Outlier,
            Severity::Medium,
            confidence,
            "test",
        )
    }

    #[test]
    fn two_agreeing_sources_are_corroborated() {
        let reports = [
            SourceReport::new("do-01", vec![report(0, 50.0, 80.0)]),
            SourceReport::new("do-02", vec![report(20, 52.0, 50.0)]),
        ];
        let validated = corroborate(&reports, &CorroborationConfig::default());

        assert_eq!(validated.len(), 1);
        assert!(validated[0].corroborated);
        assert_eq!(validated[0].sources, vec!["do-01", "do-02"]);
        assert_eq!(validated[0].anomaly.confidence, 65.0);
        assert_eq!(validated[0].anomaly.suggested_action, SuggestedAction::FieldInspection);
    }

    #[test]
    fn unrelated_third_source_stays_out_of_the_group() {
        let config = CorroborationConfig::default();
        let agreeing = || {
            vec![
                SourceReport::new("do-01", vec![report(0, 50.0, 80.0)]),
                SourceReport::new("do-02", vec![report(25, 49.0, 70.0)]),
            ]
        };

        // Weak and unrelated: dropped
        let mut reports = agreeing();
        reports.push(SourceReport::new("sal-01", vec![report(10, 31.0, 55.0)]));
        let validated = corroborate(&reports, &config);
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].sources, vec!["do-01", "do-02"]);
        assert_eq!(validated[0].anomaly.confidence, 75.0);
        assert_eq!(validated[0].anomaly.suggested_action, SuggestedAction::FieldInspection);

        // Confident and unrelated: kept on its own, untouched
        let mut reports = agreeing();
        reports.push(SourceReport::new("sal-01", vec![report(10, 31.0, 90.0)]));
        let validated = corroborate(&reports, &config);
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].anomaly.confidence, 75.0);
        assert_eq!(validated[0].sources, vec!["do-01", "do-02"]);
        assert!(!validated[1].corroborated);
        assert_eq!(validated[1].sources, vec!["sal-01"]);
        assert_eq!(validated[1].anomaly.confidence, 90.0);
        assert_eq!(validated[1].anomaly.suggested_action, SuggestedAction::Investigate);
    }

    #[test]
    fn window_and_tolerance_are_inclusive() {
        let config = CorroborationConfig::default();
        assert!(config.matches(&report(0, 50.0, 70.0), &report(60, 40.0, 70.0)));
        assert!(!config.matches(&report(0, 50.0, 70.0), &report(61, 50.0, 70.0)));
        assert!(!config.matches(&report(0, 50.0, 70.0), &report(0, 39.0, 70.0)));
    }

    #[test]
    fn weak_singletons_are_dropped() {
        let reports = [
            SourceReport::new("a", vec![report(0, 50.0, 59.9), report(300, 10.0, 75.0)]),
            SourceReport::new("b", vec![]),
        ];
        let validated = corroborate(&reports, &CorroborationConfig::default());

        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].anomaly.value, 10.0);
        assert!(!validated[0].corroborated);
        assert_eq!(validated[0].anomaly.suggested_action, SuggestedAction::Investigate);
    }

    #[test]
    fn reports_from_one_source_never_corroborate_each_other() {
        let reports = [SourceReport::new("a", vec![report(0, 50.0, 40.0), report(5, 50.0, 40.0)])];
        assert!(corroborate(&reports, &CorroborationConfig::default()).is_empty());
    }

    #[test]
    fn each_report_joins_one_group() {
        let reports = [
            SourceReport::new("a", vec![report(0, 50.0, 70.0), report(10, 50.0, 70.0)]),
            SourceReport::new("b", vec![report(5, 50.0, 90.0)]),
        ];
        let validated = corroborate(&reports, &CorroborationConfig::default());

        assert_eq!(validated.len(), 2);
        assert!(validated[0].corroborated);
        assert_eq!(validated[0].anomaly.confidence, 80.0);
        assert!(!validated[1].corroborated);
        assert_eq!(validated[1].sources, vec!["a"]);
    }
}
