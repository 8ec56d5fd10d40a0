//! Model selection and result merging
//!
//! The [`AnomalyDetector`] validates its configuration once, prepares the
//! input series (time order, finite values) and runs the detectors an
//! [`AnomalyModel`] asks for. Merged output is ranked with
//! [`rank_and_dedup`](crate::scoring::rank_and_dedup).

use carbonguard_core::time::is_monotonic;
use carbonguard_core::{DetectedAnomaly, MonitoringError, SeriesPoint};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::detectors::{
    Detector, PercentileDetector, SeasonalDetector, Sensitivity, TrendBreakDetector, ZScoreDetector,
};
use crate::scoring::rank_and_dedup;
use crate::{DetectionError, DetectionResult};
use crate::{
    DEFAULT_DEGRADATION_PCT, DEFAULT_JUMP_RATIO, DEFAULT_LOWER_PERCENTILE, DEFAULT_SEASONAL_PERIOD,
    DEFAULT_SEASONAL_THRESHOLD, DEFAULT_TREND_BREAK_PCT, DEFAULT_TREND_WINDOW, DEFAULT_UPPER_PERCENTILE,
};

/// Which detectors a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyModel {
    /// Z-score outliers
    ZScore,
    /// Percentile band and jump outliers
    IsolationForest,
    /// Trend breaks plus seasonal deviations
    Arima,
    /// Every detector
    #[default]
    Ensemble,
}

/// Parameters shared by all detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    pub sensitivity: Sensitivity,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    pub jump_ratio: f64,
    pub trend_window: usize,
    pub trend_break_pct: f64,
    pub degradation_pct: f64,
    pub seasonal_period: usize,
    pub seasonal_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::default(),
            lower_percentile: DEFAULT_LOWER_PERCENTILE,
            upper_percentile: DEFAULT_UPPER_PERCENTILE,
            jump_ratio: DEFAULT_JUMP_RATIO,
            trend_window: DEFAULT_TREND_WINDOW,
            trend_break_pct: DEFAULT_TREND_BREAK_PCT,
            degradation_pct: DEFAULT_DEGRADATION_PCT,
            seasonal_period: DEFAULT_SEASONAL_PERIOD,
            seasonal_threshold: DEFAULT_SEASONAL_THRESHOLD,
        }
    }
}

impl DetectionConfig {
    pub fn with_sensitivity(sensitivity: Sensitivity) -> Self {
        Self { sensitivity, ..Self::default() }
    }

    pub fn validate(&self) -> DetectionResult<()> {
        if self.trend_window == 0 {
            return Err(DetectionError::InvalidModel { reason: "trend window must be at least one point" });
        }
        if self.seasonal_period == 0 {
            return Err(DetectionError::InvalidModel { reason: "seasonal period must be at least one point" });
        }
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !in_range(self.lower_percentile)
            || !in_range(self.upper_percentile)
            || self.lower_percentile >= self.upper_percentile
        {
            return Err(DetectionError::InvalidModel {
                reason: "percentiles must satisfy 0 <= lower < upper <= 100",
            });
        }
        if !(self.jump_ratio > 0.0 && self.seasonal_threshold > 0.0 && self.trend_break_pct > 0.0) {
            return Err(DetectionError::InvalidModel { reason: "thresholds must be positive" });
        }
        if !(self.degradation_pct < 0.0) {
            return Err(DetectionError::InvalidModel { reason: "degradation change must be negative" });
        }
        Ok(())
    }
}

/// Runs the detectors selected by an [`AnomalyModel`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyDetector {
    zscore: ZScoreDetector,
    percentile: PercentileDetector,
    trend: TrendBreakDetector,
    seasonal: SeasonalDetector,
}

impl AnomalyDetector {
    pub fn new(config: DetectionConfig) -> DetectionResult<Self> {
        config.validate()?;
        Ok(Self {
            zscore: ZScoreDetector::new(config.sensitivity),
            percentile: PercentileDetector {
                lower_percentile: config.lower_percentile,
                upper_percentile: config.upper_percentile,
                jump_ratio: config.jump_ratio,
            },
            trend: TrendBreakDetector {
                window: config.trend_window,
                break_pct: config.trend_break_pct,
                degradation_pct: config.degradation_pct,
            },
            seasonal: SeasonalDetector {
                period: config.seasonal_period,
                threshold: config.seasonal_threshold,
            },
        })
    }

    fn detectors(&self, model: AnomalyModel) -> Vec<&dyn Detector> {
        match model {
            AnomalyModel::ZScore => vec![&self.zscore],
            AnomalyModel::IsolationForest => vec![&self.percentile],
            AnomalyModel::Arima => vec![&self.trend, &self.seasonal],
            AnomalyModel::Ensemble => vec![&self.zscore, &self.percentile, &self.trend, &self.seasonal],
        }
    }

    /// Ranked, deduplicated anomalies of `series`.
    ///
    /// Timestamps must not go backwards. Non-finite values are dropped
    /// before detection.
    pub fn detect(&self, series: &[SeriesPoint], model: AnomalyModel) -> DetectionResult<Vec<DetectedAnomaly>> {
        if !is_monotonic(series.iter().map(|p| p.timestamp)) {
            return Err(MonitoringError::UnorderedSeries { series: "anomaly detection input".to_string() }.into());
        }
        let finite: Vec<SeriesPoint> = series.iter().copied().filter(|p| p.value.is_finite()).collect();
        if finite.len() < series.len() {
            warn!("anomaly detection: dropped {} non-finite points", series.len() - finite.len());
        }

        let mut merged = Vec::new();
        for detector in self.detectors(model) {
            let found = detector.detect(&finite);
            debug!("{} detector: {} anomalies in {} points", detector.name(), found.len(), finite.len());
            merged.extend(found);
        }
        Ok(rank_and_dedup(merged))
    }
}

/// Detect with default parameters
pub fn detect_anomalies(series: &[SeriesPoint], model: &AnomalyModel) -> DetectionResult<Vec<DetectedAnomaly>> {
    AnomalyDetector::new(DetectionConfig::default())?.detect(series, *model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_series::{at, daily};
    use carbonguard_core::{AnomalyType, Severity};

    #[test]
    fn zero_window_is_invalid() {
        let config = DetectionConfig { trend_window: 0, ..DetectionConfig::default() };
        assert!(matches!(AnomalyDetector::new(config), Err(DetectionError::InvalidModel { .. })));
    }

    #[test]
    fn inverted_percentiles_are_invalid() {
        let config = DetectionConfig { lower_percentile: 90.0, upper_percentile: 10.0, ..DetectionConfig::default() };
        assert!(AnomalyDetector::new(config).is_err());
    }

    #[test]
    fn unordered_series_is_rejected() {
        let series = vec![SeriesPoint::new(at(2), 1.0), SeriesPoint::new(at(1), 1.0)];
        let err = detect_anomalies(&series, &AnomalyModel::Ensemble).unwrap_err();
        assert!(matches!(err, DetectionError::Monitoring(MonitoringError::UnorderedSeries { .. })));
    }

    #[test]
    fn empty_series_gives_nothing() {
        for model in [AnomalyModel::ZScore, AnomalyModel::IsolationForest, AnomalyModel::Arima, AnomalyModel::Ensemble] {
            assert!(detect_anomalies(&[], &model).unwrap().is_empty());
        }
    }

    #[test]
    fn non_finite_points_are_dropped() {
        let mut series = daily(&[10.0, 10.0, 10.0, 10.0, 100.0]);
        series.insert(2, SeriesPoint::new(series[1].timestamp, f64::NAN));

        let found = AnomalyDetector::new(DetectionConfig::with_sensitivity(Sensitivity::High))
            .unwrap()
            .detect(&series, AnomalyModel::ZScore)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 100.0);
    }

    #[test]
    fn ensemble_output_is_ranked_and_unique() {
        let mut values = vec![10.0; 12];
        values.extend([10.0, 10.0, 10.0, 10.0, 10.0, 30.0, 10.0, 10.0, 6.0, 6.0, 6.0, 6.0]);
        let found = detect_anomalies(&daily(&values), &AnomalyModel::Ensemble).unwrap();

        assert!(!found.is_empty());
        assert!(found.windows(2).all(|w| w[0].anomaly_score >= w[1].anomaly_score));
        let mut keys: Vec<_> = found.iter().map(|a| (a.timestamp, a.anomaly_type)).collect();
        let total = keys.len();
        keys.sort_by_key(|(t, kind)| (*t, kind.name()));
        keys.dedup();
        assert_eq!(keys.len(), total);

        // The spike shows up once as an outlier, merged across z-score and percentile
        let spike: Vec<_> = found
            .iter()
            .filter(|a| a.value == 30.0 && a.anomaly_type == AnomalyType::Outlier)
            .collect();
        assert_eq!(spike.len(), 1);
        assert_eq!(spike[0].severity, Severity::High);
    }

    #[test]
    fn arima_uses_trend_and_seasonal_only() {
        let mut values = vec![10.0; 12];
        values.extend([10.0; 6]);
        values.extend([20.0; 6]);
        let found = detect_anomalies(&daily(&values), &AnomalyModel::Arima).unwrap();

        assert!(!found.is_empty());
        assert!(found.iter().all(|a| a.anomaly_type != AnomalyType::Outlier));
        assert!(found.iter().any(|a| a.anomaly_type == AnomalyType::SeasonalDeviation));
        assert!(found.iter().any(|a| a.anomaly_type == AnomalyType::TrendBreak));
    }
}
