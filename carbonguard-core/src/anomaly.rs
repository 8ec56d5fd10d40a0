//! Anomaly Types Shared Across Stages
//!
//! ## Overview
//!
//! Anomalies are produced by the detectors in `carbonguard-ml` and by the
//! sensor aggregator's per-reading checks, then consumed by validation and
//! readiness. They are plain immutable records: once a detector emits a
//! [`DetectedAnomaly`] nothing downstream edits it. Corroboration builds a
//! new record instead.
//!
//! ## Severity Ladder
//!
//! ```text
//! Low    → Monitor           keep watching the series
//! Medium → Investigate       check the source for faults
//! High   → FieldInspection   send someone to the site
//!          Escalate          corroborated high-priority signal
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-level severity used by anomalies, flags and discrepancies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn name(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Default action for an anomaly of this severity
    pub const fn default_action(&self) -> SuggestedAction {
        match self {
            Severity::Low => SuggestedAction::Monitor,
            Severity::Medium => SuggestedAction::Investigate,
            Severity::High => SuggestedAction::FieldInspection,
        }
    }
}

/// Kind of anomaly a detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    Outlier,
    TrendBreak,
    SeasonalDeviation,
    Degradation,
}

impl AnomalyType {
    pub const fn name(&self) -> &'static str {
        match self {
            AnomalyType::Outlier => "outlier",
            AnomalyType::TrendBreak => "trend_break",
            AnomalyType::SeasonalDeviation => "seasonal_deviation",
            AnomalyType::Degradation => "degradation",
        }
    }
}

/// Follow-up tiers, ordered by priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Monitor,
    Investigate,
    FieldInspection,
    Escalate,
}

impl SuggestedAction {
    /// Next higher tier; `Escalate` is the ceiling
    pub const fn escalate(&self) -> Self {
        match self {
            SuggestedAction::Monitor => SuggestedAction::Investigate,
            SuggestedAction::Investigate => SuggestedAction::FieldInspection,
            SuggestedAction::FieldInspection | SuggestedAction::Escalate => SuggestedAction::Escalate,
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            SuggestedAction::Monitor => "Continue monitoring the series",
            SuggestedAction::Investigate => "Investigate the source for faults or interference",
            SuggestedAction::FieldInspection => "Schedule a field inspection of the site",
            SuggestedAction::Escalate => "Escalate to the verification team",
        }
    }
}

/// Single point of a numeric time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Anomaly reported by a detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAnomaly {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// How unusual the point is, in [0, 1]
    pub anomaly_score: f64,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub explanation: String,
    /// Detector confidence, in [0, 100]
    pub confidence: f64,
    pub suggested_action: SuggestedAction,
}

impl DetectedAnomaly {
    /// Build an anomaly, clamping score and confidence into range
    pub fn new(
        point: SeriesPoint,
        anomaly_score: f64,
        anomaly_type: AnomalyType,
        severity: Severity,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: point.timestamp,
            value: point.value,
            anomaly_score: crate::stats::clamp_unit(anomaly_score),
            anomaly_type,
            severity,
            explanation: explanation.into(),
            confidence: crate::stats::clamp_score(confidence),
            suggested_action: severity.default_action(),
        }
    }

    pub fn is_high_severity(&self) -> bool {
        self.severity == Severity::High
    }
}
