//! Temporal alignment across sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::readiness::{MIN_TEMPORAL_CONSISTENCY, MIN_TEMPORAL_COVERAGE, MISALIGNED_PAIR_PENALTY};
use crate::constants::time::ALIGNMENT_GAP_DAYS;
use crate::constants::EPSILON;
use crate::stats::clamp_score;
use crate::time::{days_between, DateRange};

/// Thresholds of the alignment check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlignmentConfig {
    /// Gap between consecutive samples (or latest timestamps) that counts as misaligned
    pub gap_days: f64,
    pub misaligned_pair_penalty: f64,
    pub min_coverage_pct: f64,
    pub min_consistency: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            gap_days: ALIGNMENT_GAP_DAYS,
            misaligned_pair_penalty: MISALIGNED_PAIR_PENALTY,
            min_coverage_pct: MIN_TEMPORAL_COVERAGE,
            min_consistency: MIN_TEMPORAL_CONSISTENCY,
        }
    }
}

/// Stretch between two consecutive observations longer than the gap limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalGap {
    pub range: DateRange,
    pub days: f64,
}

/// Timestamps of one source
#[derive(Debug, Clone, Copy)]
pub struct SourceTimeline<'a> {
    pub source: &'a str,
    pub timestamps: &'a [DateTime<Utc>],
}

impl<'a> SourceTimeline<'a> {
    pub fn new(source: &'a str, timestamps: &'a [DateTime<Utc>]) -> Self {
        Self { source, timestamps }
    }

    fn latest(&self) -> Option<DateTime<Utc>> {
        self.timestamps.iter().max().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAlignmentInfo {
    pub aligned: bool,
    pub gaps: Vec<TemporalGap>,
    /// Share of the monitoring period not lost to gaps, in [0, 100]
    pub coverage_pct: f64,
    /// 100 minus the penalty for each pair of sources whose latest timestamps disagree
    pub consistency_score: f64,
    pub misaligned_pairs: Vec<(String, String)>,
    pub observation_count: usize,
}

/// Check that the sources jointly cover `period` and report recent data together.
///
/// With no timestamps at all the coverage is 0 and the sources are not aligned.
pub fn assess_temporal_alignment(
    period: &DateRange,
    sources: &[SourceTimeline<'_>],
    config: &AlignmentConfig,
) -> TemporalAlignmentInfo {
    let mut all: Vec<DateTime<Utc>> = sources.iter().flat_map(|s| s.timestamps.iter().copied()).collect();
    all.sort();

    let gaps: Vec<TemporalGap> = all
        .windows(2)
        .filter_map(|pair| {
            let days = days_between(pair[0], pair[1]);
            (days > config.gap_days).then(|| TemporalGap {
                range: DateRange { start: pair[0], end: pair[1] },
                days,
            })
        })
        .collect();

    let coverage_pct = if all.is_empty() {
        0.0
    } else {
        let gap_days: f64 = gaps.iter().map(|g| g.days).sum();
        clamp_score(100.0 - gap_days / (period.days() + EPSILON) * 100.0)
    };

    let latest: Vec<(&str, DateTime<Utc>)> =
        sources.iter().filter_map(|s| s.latest().map(|t| (s.source, t))).collect();
    let mut misaligned_pairs = Vec::new();
    for (i, (a, a_latest)) in latest.iter().enumerate() {
        for (b, b_latest) in &latest[i + 1..] {
            if days_between(*a_latest, *b_latest) > config.gap_days {
                misaligned_pairs.push((a.to_string(), b.to_string()));
            }
        }
    }
    let consistency_score =
        clamp_score(100.0 - misaligned_pairs.len() as f64 * config.misaligned_pair_penalty);

    let aligned = !all.is_empty()
        && gaps.is_empty()
        && coverage_pct >= config.min_coverage_pct
        && consistency_score >= config.min_consistency;

    TemporalAlignmentInfo {
        aligned,
        gaps,
        coverage_pct,
        consistency_score,
        misaligned_pairs,
        observation_count: all.len(),
    }
}
