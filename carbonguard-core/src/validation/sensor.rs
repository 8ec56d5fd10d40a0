//! Rule table for aggregated sensor data

use chrono::Duration;

use crate::errors::{MonitoringError, MonitoringResult};
use crate::sensor::AggregatedSensorData;

use super::rules::{Rule, RuleContext, RuleOutcome, RuleSeverity, RuleTable};

const NO_READINGS: &str = "No readings in the aggregation window";

/// Default sensor rules, in evaluation order
pub fn sensor_rules() -> RuleTable<AggregatedSensorData> {
    vec![
        Rule::new(
            "physical_bounds",
            RuleSeverity::Critical,
            "Inspect or recalibrate the device; readings exceed physical limits",
            physical_bounds,
        ),
        Rule::new(
            "sensor_confidence",
            RuleSeverity::Warning,
            "Check device health; reported confidence is low",
            sensor_confidence,
        ),
        Rule::new(
            "quality_flag",
            RuleSeverity::Warning,
            "Exclude or re-collect readings the device marked bad",
            quality_flag,
        ),
        Rule::new(
            "reading_age",
            RuleSeverity::Warning,
            "Data is stale; verify the device is still transmitting",
            reading_age,
        ),
        Rule::new(
            "reading_freshness",
            RuleSeverity::Info,
            "No reading in the last day",
            reading_freshness,
        ),
    ]
}

fn physical_bounds(data: &AggregatedSensorData, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    if !data.has_readings() {
        return Ok(RuleOutcome::Fail(NO_READINGS.to_string()));
    }
    let sensor_type = ctx.sensor_type.unwrap_or(data.sensor_type);
    let profile = sensor_type.profile();
    let (min, max) = (data.statistics.min, data.statistics.max);
    if !min.is_finite() || !max.is_finite() {
        return Err(MonitoringError::RuleEvaluation {
            rule: "physical_bounds",
            reason: "statistics are not finite".to_string(),
        });
    }
    if profile.contains(min) && profile.contains(max) {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "Readings span [{}, {}] {}, outside {} bounds [{}, {}]",
            min, max, profile.unit, sensor_type, profile.min, profile.max
        )))
    }
}

fn sensor_confidence(data: &AggregatedSensorData, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    if !data.has_readings() {
        return Ok(RuleOutcome::Fail(NO_READINGS.to_string()));
    }
    let minimum = ctx.config.min_sensor_confidence;
    if data.mean_confidence > minimum {
        Ok(RuleOutcome::Pass)
    } else {
        Ok(RuleOutcome::Fail(format!(
            "Mean confidence {:.1}% not above {}%",
            data.mean_confidence, minimum
        )))
    }
}

fn quality_flag(data: &AggregatedSensorData, _ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    if !data.has_readings() {
        return Ok(RuleOutcome::Fail(NO_READINGS.to_string()));
    }
    match data.quality_counts.bad {
        0 => Ok(RuleOutcome::Pass),
        bad => Ok(RuleOutcome::Fail(format!("{} readings flagged bad by the device", bad))),
    }
}

fn age_rule(data: &AggregatedSensorData, ctx: &RuleContext<'_>, limit: Duration) -> RuleOutcome {
    let Some(latest) = data.latest() else {
        return RuleOutcome::Fail(NO_READINGS.to_string());
    };
    let age = ctx.now - latest;
    if age <= limit {
        RuleOutcome::Pass
    } else {
        RuleOutcome::Fail(format!("Latest reading is {} hours old", age.num_hours()))
    }
}

fn reading_age(data: &AggregatedSensorData, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let limit = Duration::try_days(ctx.config.max_reading_age_days).ok_or_else(|| MonitoringError::RuleEvaluation {
        rule: "reading_age",
        reason: format!("{} days is not a representable age", ctx.config.max_reading_age_days),
    })?;
    Ok(age_rule(data, ctx, limit))
}

fn reading_freshness(data: &AggregatedSensorData, ctx: &RuleContext<'_>) -> MonitoringResult<RuleOutcome> {
    let limit = Duration::try_hours(ctx.config.fresh_reading_age_hours).ok_or_else(|| MonitoringError::RuleEvaluation {
        rule: "reading_freshness",
        reason: format!("{} hours is not a representable age", ctx.config.fresh_reading_age_hours),
    })?;
    Ok(age_rule(data, ctx, limit))
}
