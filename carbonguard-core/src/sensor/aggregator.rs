//! Sensor aggregation: statistics, quality and per-reading flags

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::anomaly::Severity;
use crate::constants::sensors::{DRIFT_DERATING, OUTLIER_SIGMA};
use crate::errors::{MonitoringError, MonitoringResult};
use crate::location::GeoPoint;
use crate::stats::{clamp_score, mean, percentage, SeriesStats};
use crate::time::is_monotonic;

use super::{
    AggregatedSensorData, AnomalyFlag, FlagKind, QualityCounts, ReadingQuality, SensorReading,
    SensorType, TimeWindow,
};

/// Tunables of the sensor aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregatorConfig {
    /// Multiplier applied to the valid-reading share
    pub drift_derating: f64,
    /// Deviations from the mean (in sigma) that flag an outlier
    pub outlier_sigma: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            drift_derating: DRIFT_DERATING,
            outlier_sigma: OUTLIER_SIGMA,
        }
    }
}

/// Condenses a batch of device readings
#[derive(Debug, Clone, Default)]
pub struct SensorAggregator {
    config: AggregatorConfig,
}

impl SensorAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Aggregate one device's readings
    ///
    /// Empty input gives zeroed statistics and quality 0. Timestamps going
    /// backwards are rejected.
    pub fn aggregate(
        &self,
        sensor_id: &str,
        readings: &[SensorReading],
        location: GeoPoint,
        sensor_type: SensorType,
    ) -> MonitoringResult<AggregatedSensorData> {
        if !is_monotonic(readings.iter().map(|r| r.timestamp)) {
            return Err(MonitoringError::UnorderedSeries { series: sensor_id.to_string() });
        }

        let finite: Vec<&SensorReading> = readings.iter().filter(|r| r.value.is_finite()).collect();
        if finite.len() < readings.len() {
            warn!(
                "sensor {}: ignoring {} non-finite readings",
                sensor_id,
                readings.len() - finite.len()
            );
        }

        let values: Vec<f64> = finite.iter().map(|r| r.value).collect();
        let statistics = SeriesStats::from_values(&values);

        let quality_counts = readings.iter().fold(QualityCounts::default(), |mut counts, r| {
            match r.quality {
                ReadingQuality::Valid => counts.valid += 1,
                ReadingQuality::Questionable => counts.questionable += 1,
                ReadingQuality::Bad => counts.bad += 1,
            }
            counts
        });

        let data_quality = clamp_score(
            percentage(quality_counts.valid, readings.len()) * self.config.drift_derating,
        );
        let confidences: Vec<f64> = readings.iter().map(|r| r.confidence).collect();

        let anomaly_flags = self.flag_readings(&finite, &statistics, sensor_type);
        debug!(
            "sensor {} ({}): {} readings, {} flags, quality {:.1}",
            sensor_id,
            sensor_type,
            readings.len(),
            anomaly_flags.len(),
            data_quality
        );

        let window = match (readings.first(), readings.last()) {
            (Some(first), Some(last)) => Some(TimeWindow { start: first.timestamp, end: last.timestamp }),
            _ => None,
        };

        Ok(AggregatedSensorData {
            sensor_id: sensor_id.to_string(),
            sensor_type,
            location,
            window,
            reading_count: readings.len(),
            statistics,
            anomaly_flags,
            data_quality,
            quality_counts,
            mean_confidence: clamp_score(mean(&confidences).unwrap_or(0.0)),
            timestamps: readings.iter().map(|r| r.timestamp).collect(),
        })
    }

    fn flag_readings(
        &self,
        readings: &[&SensorReading],
        stats: &SeriesStats,
        sensor_type: SensorType,
    ) -> Vec<AnomalyFlag> {
        let profile = sensor_type.profile();
        let mut flags = Vec::new();

        for (i, reading) in readings.iter().enumerate() {
            let value = reading.value;

            if !profile.contains(value) {
                flags.push(AnomalyFlag {
                    timestamp: reading.timestamp,
                    value,
                    kind: FlagKind::OutOfRange,
                    severity: Severity::High,
                    reason: format!(
                        "Value {} outside plausible {} range [{}, {}] {}",
                        value, sensor_type, profile.min, profile.max, profile.unit
                    ),
                });
            } else if stats.std_dev > 0.0
                && (value - stats.mean).abs() > self.config.outlier_sigma * stats.std_dev
            {
                flags.push(AnomalyFlag {
                    timestamp: reading.timestamp,
                    value,
                    kind: FlagKind::StatisticalOutlier,
                    severity: Severity::High,
                    reason: format!(
                        "Value {} deviates more than {}σ from mean {:.3} (expected range [{:.3}, {:.3}])",
                        value,
                        self.config.outlier_sigma,
                        stats.mean,
                        stats.mean - self.config.outlier_sigma * stats.std_dev,
                        stats.mean + self.config.outlier_sigma * stats.std_dev
                    ),
                });
            }

            if i > 0 {
                let previous = readings[i - 1].value;
                let jump = (value - previous).abs();
                if jump > profile.jump_threshold {
                    flags.push(AnomalyFlag {
                        timestamp: reading.timestamp,
                        value,
                        kind: FlagKind::SuddenJump,
                        severity: Severity::Medium,
                        reason: format!(
                            "Jump of {:.3} {} from previous reading exceeds {}",
                            jump, profile.unit, profile.jump_threshold
                        ),
                    });
                }
            }
        }

        flags
    }
}
