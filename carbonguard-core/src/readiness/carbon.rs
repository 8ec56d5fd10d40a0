//! Carbon sequestration estimate

use serde::{Deserialize, Serialize};

use crate::constants::readiness::{
    BASELINE_CONFIDENCE, BASELINE_SEQUESTRATION_RATE, CARBON_FRACTION, CO2_PER_CARBON,
};
use crate::constants::time::DAYS_PER_YEAR;
use crate::satellite::BiomassEstimate;
use crate::stats::clamp_score;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarbonConfig {
    /// Annual rate assumed without a biomass estimate, t C/ha/yr
    pub baseline_rate: f64,
    pub carbon_fraction: f64,
    pub baseline_confidence: f64,
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            baseline_rate: BASELINE_SEQUESTRATION_RATE,
            carbon_fraction: CARBON_FRACTION,
            baseline_confidence: BASELINE_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    /// Default regional rate
    Baseline,
    /// Derived from the satellite biomass estimate
    Biomass,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSequestrationEstimate {
    pub method: EstimateMethod,
    pub annual_rate: f64,
    /// Carbon sequestered over the period across the whole area
    pub total_carbon: f64,
    pub total_co2e: f64,
    pub period_days: f64,
    pub confidence: f64,
}

/// Estimate sequestration for `area_ha` over `period_days`.
///
/// Periods shorter than one day are treated as one day. A missing or zero
/// biomass estimate falls back to the baseline rate.
pub fn estimate_sequestration(
    biomass: Option<&BiomassEstimate>,
    area_ha: f64,
    period_days: f64,
    config: &CarbonConfig,
) -> CarbonSequestrationEstimate {
    let days = period_days.max(1.0);

    let (method, annual_rate, confidence) = match biomass {
        Some(b) if b.estimated_biomass > 0.0 && area_ha > 0.0 => (
            EstimateMethod::Biomass,
            b.estimated_biomass * config.carbon_fraction / area_ha * (DAYS_PER_YEAR / days),
            clamp_score(b.confidence),
        ),
        _ => (EstimateMethod::Baseline, config.baseline_rate, config.baseline_confidence),
    };

    let total_carbon = annual_rate * days / DAYS_PER_YEAR * area_ha;
    CarbonSequestrationEstimate {
        method,
        annual_rate,
        total_carbon,
        total_co2e: total_carbon * CO2_PER_CARBON,
        period_days: days,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satellite::BiomassMethod;
    use chrono::{TimeZone, Utc};

    fn biomass(value: f64) -> BiomassEstimate {
        BiomassEstimate {
            estimated_biomass: value,
            method: BiomassMethod::Allometric,
            confidence: 82.0,
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn baseline_without_biomass() {
        let estimate = estimate_sequestration(None, 100.0, 365.0, &CarbonConfig::default());
        assert_eq!(estimate.method, EstimateMethod::Baseline);
        assert!((estimate.total_carbon - 350.0).abs() < 1e-9);
        assert!((estimate.total_co2e - 350.0 * 44.0 / 12.0).abs() < 1e-9);
        assert_eq!(estimate.confidence, 70.0);
    }

    #[test]
    fn biomass_rate_scales_to_a_year() {
        let estimate = estimate_sequestration(Some(&biomass(2.0)), 10.0, 73.0, &CarbonConfig::default());
        // 2.0 * 0.5 / 10 * (365 / 73)
        assert!((estimate.annual_rate - 0.5).abs() < 1e-9);
        // Total collapses back to biomass x carbon fraction
        assert!((estimate.total_carbon - 1.0).abs() < 1e-9);
        assert_eq!(estimate.confidence, 82.0);
    }

    #[test]
    fn zero_biomass_falls_back() {
        let estimate = estimate_sequestration(Some(&biomass(0.0)), 10.0, 30.0, &CarbonConfig::default());
        assert_eq!(estimate.method, EstimateMethod::Baseline);
    }
}
