//! Combined data quality and freshness

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::time::{
    FRESHNESS_CURRENT_SECONDS, FRESHNESS_REAL_TIME_SECONDS, FRESHNESS_RECENT_SECONDS,
};
use crate::stats::clamp_score;

/// Age bucket of the newest observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    RealTime,
    Current,
    Recent,
    Stale,
}

impl Freshness {
    /// Bucket for the newest observation as seen at `now`; no observation is stale
    pub fn classify(latest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(latest) = latest else {
            return Freshness::Stale;
        };
        let age = (now - latest).num_seconds().max(0);
        if age <= FRESHNESS_REAL_TIME_SECONDS {
            Freshness::RealTime
        } else if age <= FRESHNESS_CURRENT_SECONDS {
            Freshness::Current
        } else if age <= FRESHNESS_RECENT_SECONDS {
            Freshness::Recent
        } else {
            Freshness::Stale
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityMetrics {
    pub satellite_quality: f64,
    pub sensor_quality: f64,
    pub temporal_coverage: f64,
    /// Effective spatial coverage stands in for a spatial quality score
    pub spatial_quality: f64,
    /// Mean of the four components
    pub overall_score: f64,
    pub freshness: Freshness,
    pub latest_observation: Option<DateTime<Utc>>,
}

impl DataQualityMetrics {
    pub fn new(
        satellite_quality: f64,
        sensor_quality: f64,
        temporal_coverage: f64,
        spatial_quality: f64,
        latest_observation: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let parts = [satellite_quality, sensor_quality, temporal_coverage, spatial_quality].map(clamp_score);
        Self {
            satellite_quality: parts[0],
            sensor_quality: parts[1],
            temporal_coverage: parts[2],
            spatial_quality: parts[3],
            overall_score: clamp_score(parts.iter().sum::<f64>() / parts.len() as f64),
            freshness: Freshness::classify(latest_observation, now),
            latest_observation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn freshness_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 9, 10, 12, 0, 0).unwrap();
        let ago = |d: Duration| Some(now - d);

        assert_eq!(Freshness::classify(ago(Duration::minutes(30)), now), Freshness::RealTime);
        assert_eq!(Freshness::classify(ago(Duration::hours(1)), now), Freshness::RealTime);
        assert_eq!(Freshness::classify(ago(Duration::hours(5)), now), Freshness::Current);
        assert_eq!(Freshness::classify(ago(Duration::days(3)), now), Freshness::Recent);
        assert_eq!(Freshness::classify(ago(Duration::days(8)), now), Freshness::Stale);
        assert_eq!(Freshness::classify(None, now), Freshness::Stale);
    }

    #[test]
    fn overall_is_mean_of_clamped_parts() {
        let now = Utc.with_ymd_and_hms(2024, 9, 10, 0, 0, 0).unwrap();
        let metrics = DataQualityMetrics::new(90.0, 70.0, 150.0, 40.0, None, now);
        assert_eq!(metrics.temporal_coverage, 100.0);
        assert_eq!(metrics.overall_score, 75.0);
    }
}
