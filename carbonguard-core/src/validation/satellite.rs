//! Rule table for satellite analysis results

use crate::errors::{MonitoringError, MonitoringResult};
use crate::satellite::SatelliteAnalysisResult;

use super::rules::{Rule, RuleContext, RuleOutcome, RuleSeverity, RuleTable};

/// Default satellite rules, in evaluation order
pub fn satellite_rules() -> RuleTable<SatelliteAnalysisResult> {
    vec![
        Rule::new(
            "index_range",
            RuleSeverity::Critical,
            "Re-run index extraction; values outside [-1, 1] indicate a band mix-up",
            index_range,
        ),
        Rule::new(
            "index_confidence",
            RuleSeverity::Warning,
            "Low-confidence index samples can be floored to the minimum by auto-fix",
            index_confidence,
        )
        .auto_fixable(),
        Rule::new(
            "seasonal_change",
            RuleSeverity::Warning,
            "Check the historical baseline; cover change is outside the seasonal envelope",
            seasonal_change,
        ),
        Rule::new(
            "biomass_range",
            RuleSeverity::Critical,
            "Biomass is implausible; recalibrate the allometric model for this ecosystem",
            biomass_range,
        ),
        Rule::new(
            "cloud_cover",
            RuleSeverity::Warning,
            "Re-acquire imagery for a clearer window or add radar coverage",
            cloud_cover,
        ),
        Rule::new(
            "completeness",
            RuleSeverity::Warning,
            "Extend the date range to collect more high-quality samples",
            completeness,
        ),
        Rule::new(
            "health_score_range",
            RuleSeverity::Critical,
            "Health score out of range; inspect the scoring inputs",
            health_score_range,
        ),
    ]
}

fn not_finite(rule: &'static str, what: &str) -> MonitoringError {
    MonitoringError::RuleEvaluation { rule, reason: format!("{} is not a finite number", what) }
}

fn index_range(result: &SatelliteAnalysisResult, _ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    if result.index_series.is_empty() {
        return Ok(RuleOutcome::NotApplicable);
    }
    for sample in &result.index_series {
        if !sample.value.is_finite() {
            return Err(not_finite("index_range", "index sample"));
        }
        if !(-1.0..=1.0).contains(&sample.value) {
            return Ok(RuleOutcome::Fail(format!(
                "Index {:.3} at {} outside [-1, 1]",
                sample.value, sample.timestamp
            )));
        }
    }
    Ok(RuleOutcome::Pass)
}

fn index_confidence(result: &SatelliteAnalysisResult, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    if result.index_series.is_empty() {
        return Ok(RuleOutcome::NotApplicable);
    }
    let minimum = ctx.config.min_index_confidence;
    let low = result.index_series.iter().filter(|s| s.confidence < minimum).count();
    if low == 0 {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "{} of {} index samples below {}% confidence",
            low,
            result.index_series.len(),
            minimum
        )))
    }
}

fn seasonal_change(result: &SatelliteAnalysisResult, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let Some(change) = result.vegetation_cover_change_pct else {
        return Ok(RuleOutcome::NotApplicable);
    };
    if !change.is_finite() {
        return Err(not_finite("seasonal_change", "vegetation cover change"));
    }
    let (min, max) = (ctx.config.cover_change_min_pct, ctx.config.cover_change_max_pct);
    if change >= min && change <= max {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!("Cover change {:.1}% outside [{}%, {}%]", change, min, max)))
    }
}

fn biomass_range(result: &SatelliteAnalysisResult, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let biomass = result.biomass.estimated_biomass;
    if !biomass.is_finite() {
        return Err(not_finite("biomass_range", "biomass estimate"));
    }
    if biomass > 0.0 && biomass < ctx.config.max_biomass_t_ha {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "Biomass {:.2} t/ha outside (0, {})",
            biomass, ctx.config.max_biomass_t_ha
        )))
    }
}

fn cloud_cover(result: &SatelliteAnalysisResult, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let cover = result.data_quality.cloud_cover_pct;
    if cover <= ctx.config.max_cloud_cover_pct {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "Cloud cover {:.1}% exceeds {}%",
            cover, ctx.config.max_cloud_cover_pct
        )))
    }
}

fn completeness(result: &SatelliteAnalysisResult, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let completeness = result.data_quality.completeness_pct;
    if completeness >= ctx.config.min_completeness_pct {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "Completeness {:.1}% below {}%",
            completeness, ctx.config.min_completeness_pct
        )))
    }
}

fn health_score_range(result: &SatelliteAnalysisResult, _ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let health = result.health_score;
    if !health.is_finite() {
        return Err(not_finite("health_score_range", "health score"));
    }
    if (0.0..=100.0).contains(&health) {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!("Health score {:.1} outside [0, 100]", health)))
    }
}
