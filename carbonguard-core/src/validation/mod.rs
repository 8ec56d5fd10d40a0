//! Rule-Based Validation
//!
//! ## Overview
//!
//! Satellite results and aggregated sensor data are validated independently
//! against named rule tables. Each rule carries a [`RuleSeverity`]:
//!
//! - **Critical**: any failure makes the source invalid
//! - **Warning**: lowers the quality score only
//! - **Info**: lowers the quality score and is reported among the warnings
//!
//! ## Scoring
//!
//! ```text
//! quality   = passed / evaluated x 100     (not-applicable rules excluded)
//! is_valid  = no critical failure AND quality >= 70
//! action    = APPROVE            valid, quality >= 85
//!             REVIEW             valid
//!             REQUEST_MORE_DATA  invalid, quality >= 60
//!             REJECT             otherwise
//! ```
//!
//! A rule whose evaluator returns an error is recorded as a warning-level
//! failure; the remaining rules still run.

mod rules;
mod satellite;
mod sensor;

pub use rules::{Rule, RuleContext, RuleFailure, RuleFn, RuleOutcome, RuleSeverity, RuleTable};
pub use satellite::satellite_rules;
pub use sensor::sensor_rules;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::quality::*;
use crate::satellite::SatelliteAnalysisResult;
use crate::sensor::{AggregatedSensorData, SensorType};
use crate::stats::{clamp_score, mean, percentage};
use crate::time::{SystemClock, TimeSource};

/// Thresholds used by the default rule tables and by scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    pub valid_threshold: f64,
    pub approve_threshold: f64,
    pub more_data_threshold: f64,
    pub min_index_confidence: f64,
    pub cover_change_min_pct: f64,
    pub cover_change_max_pct: f64,
    pub max_biomass_t_ha: f64,
    pub max_cloud_cover_pct: f64,
    pub min_completeness_pct: f64,
    pub min_sensor_confidence: f64,
    pub max_reading_age_days: i64,
    pub fresh_reading_age_hours: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            valid_threshold: QUALITY_VALID_THRESHOLD,
            approve_threshold: QUALITY_APPROVE_THRESHOLD,
            more_data_threshold: QUALITY_MORE_DATA_THRESHOLD,
            min_index_confidence: MIN_INDEX_CONFIDENCE,
            cover_change_min_pct: COVER_CHANGE_MIN_PCT,
            cover_change_max_pct: COVER_CHANGE_MAX_PCT,
            max_biomass_t_ha: MAX_BIOMASS_T_HA,
            max_cloud_cover_pct: MAX_CLOUD_COVER_PCT,
            min_completeness_pct: MIN_COMPLETENESS_PCT,
            min_sensor_confidence: MIN_SENSOR_CONFIDENCE,
            max_reading_age_days: MAX_READING_AGE_DAYS,
            fresh_reading_age_hours: FRESH_READING_AGE_HOURS,
        }
    }
}

/// What to do with a validated source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Approve,
    Review,
    RequestMoreData,
    Reject,
}

impl RecommendedAction {
    pub fn from_score(is_valid: bool, quality_score: f64, config: &ValidationConfig) -> Self {
        match (is_valid, quality_score) {
            (true, q) if q >= config.approve_threshold => RecommendedAction::Approve,
            (true, _) => RecommendedAction::Review,
            (false, q) if q >= config.more_data_threshold => RecommendedAction::RequestMoreData,
            (false, _) => RecommendedAction::Reject,
        }
    }
}

/// Outcome of validating one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValidationResult {
    pub is_valid: bool,
    /// Rules evaluated, excluding not-applicable ones
    pub checks_performed: usize,
    pub checks_passed: usize,
    pub failures: Vec<RuleFailure>,
    /// Messages of every non-critical failure
    pub warnings: Vec<String>,
    pub quality_score: f64,
    pub suggestions: Vec<String>,
    pub recommended_action: RecommendedAction,
}

impl DataValidationResult {
    pub fn critical_failures(&self) -> impl Iterator<Item = &RuleFailure> {
        self.failures.iter().filter(|f| f.severity.is_critical())
    }

    pub fn has_critical_failures(&self) -> bool {
        self.critical_failures().next().is_some()
    }
}

/// Applies the rule tables to satellite and sensor results
#[derive(Debug, Clone)]
pub struct ValidationPipeline<C = SystemClock> {
    clock: C,
    config: ValidationConfig,
    satellite_rules: RuleTable<SatelliteAnalysisResult>,
    sensor_rules: RuleTable<AggregatedSensorData>,
}

impl ValidationPipeline<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ValidationPipeline<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> ValidationPipeline<C> {
    /// Pipeline with the default rule tables, reading "now" from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            config: ValidationConfig::default(),
            satellite_rules: satellite_rules(),
            sensor_rules: sensor_rules(),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn add_satellite_rule(&mut self, rule: Rule<SatelliteAnalysisResult>) {
        self.satellite_rules.push(rule);
    }

    pub fn add_sensor_rule(&mut self, rule: Rule<AggregatedSensorData>) {
        self.sensor_rules.push(rule);
    }

    pub fn validate_satellite(&self, result: &SatelliteAnalysisResult) -> DataValidationResult {
        let ctx = RuleContext { now: self.clock.now(), sensor_type: None, config: &self.config };
        evaluate_rules("satellite", result, &self.satellite_rules, &ctx)
    }

    pub fn validate_sensor(
        &self,
        data: &AggregatedSensorData,
        sensor_type: SensorType,
    ) -> DataValidationResult {
        let ctx = RuleContext {
            now: self.clock.now(),
            sensor_type: Some(sensor_type),
            config: &self.config,
        };
        evaluate_rules(&data.sensor_id, data, &self.sensor_rules, &ctx)
    }

    /// Corrected copy of `result`: index confidences below the minimum are
    /// raised to it and the biomass confidence is recomputed from them.
    pub fn apply_auto_fixes(&self, result: &SatelliteAnalysisResult) -> SatelliteAnalysisResult {
        let floor = self.config.min_index_confidence;
        let mut fixed = result.clone();
        let mut raised = 0;
        for sample in &mut fixed.index_series {
            if sample.confidence < floor {
                sample.confidence = floor;
                raised += 1;
            }
        }
        if raised > 0 {
            let confidences: Vec<f64> = fixed.index_series.iter().map(|s| s.confidence).collect();
            fixed.biomass.confidence = clamp_score(mean(&confidences).unwrap_or(0.0));
            debug!("auto-fix raised {} index confidences to {}", raised, floor);
        }
        fixed
    }
}

fn evaluate_rules<T>(
    source: &str,
    subject: &T,
    rules: &[Rule<T>],
    ctx: &RuleContext<'_>,
) -> DataValidationResult {
    let mut performed = 0;
    let mut passed = 0;
    let mut failures = Vec::new();
    let mut suggestions = Vec::new();

    for rule in rules {
        let failure = match (rule.evaluate)(subject, ctx) {
            Ok(RuleOutcome::NotApplicable) => continue,
            Ok(RuleOutcome::Pass) => {
                performed += 1;
                passed += 1;
                continue;
            }
            Ok(RuleOutcome::Fail(message)) => RuleFailure {
                rule: rule.name.to_string(),
                severity: rule.severity,
                message,
                auto_fixable: rule.auto_fixable,
            },
            Err(err) => {
                warn!("{}: rule {} failed to evaluate: {}", source, rule.name, err);
                RuleFailure {
                    rule: rule.name.to_string(),
                    severity: RuleSeverity::Warning,
                    message: err.to_string(),
                    auto_fixable: false,
                }
            }
        };
        performed += 1;
        suggestions.push(rule.suggestion.to_string());
        failures.push(failure);
    }

    let quality_score = clamp_score(percentage(passed, performed));
    let has_critical = failures.iter().any(|f| f.severity.is_critical());
    let is_valid = !has_critical && quality_score >= ctx.config.valid_threshold;
    let warnings = failures
        .iter()
        .filter(|f| !f.severity.folded().is_critical())
        .map(|f| format!("{}: {}", f.rule, f.message))
        .collect();

    let recommended_action = RecommendedAction::from_score(is_valid, quality_score, ctx.config);
    debug!(
        "{}: {}/{} checks passed, quality {:.1}, {:?}",
        source, passed, performed, quality_score, recommended_action
    );

    DataValidationResult {
        is_valid,
        checks_performed: performed,
        checks_passed: passed,
        failures,
        warnings,
        quality_score,
        suggestions,
        recommended_action,
    }
}
