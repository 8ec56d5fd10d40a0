//! Rule definitions shared by the satellite and sensor tables

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MonitoringResult;
use crate::sensor::SensorType;

use super::ValidationConfig;

/// Three-level rule severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Info,
    Warning,
    Critical,
}

impl RuleSeverity {
    /// Collapse to the two levels reported in a validation result.
    ///
    /// `Info` becomes `Warning`; the others are unchanged.
    pub const fn folded(&self) -> RuleSeverity {
        match self {
            RuleSeverity::Critical => RuleSeverity::Critical,
            RuleSeverity::Warning | RuleSeverity::Info => RuleSeverity::Warning,
        }
    }

    pub const fn is_critical(&self) -> bool {
        matches!(self, RuleSeverity::Critical)
    }
}

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Pass,
    Fail(String),
    /// The subject carries nothing this rule can judge; excluded from scoring
    NotApplicable,
}

/// Inputs every rule may consult besides its subject
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub now: DateTime<Utc>,
    /// Set when validating sensor data
    pub sensor_type: Option<SensorType>,
    pub config: &'a ValidationConfig,
}

/// Evaluator signature of a rule over subject `T`
pub type RuleFn<T> = fn(&T, &RuleContext<'_>) -> MonitoringResult<RuleOutcome>;

/// A named, severity-tagged check
pub struct Rule<T> {
    pub name: &'static str,
    pub severity: RuleSeverity,
    /// Whether `apply_auto_fixes` can correct a failure of this rule
    pub auto_fixable: bool,
    /// Shown to the operator when the rule fails
    pub suggestion: &'static str,
    pub evaluate: RuleFn<T>,
}

impl<T> Rule<T> {
    pub fn new(
        name: &'static str,
        severity: RuleSeverity,
        suggestion: &'static str,
        evaluate: RuleFn<T>,
    ) -> Self {
        Self { name, severity, auto_fixable: false, suggestion, evaluate }
    }

    pub fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            severity: self.severity,
            auto_fixable: self.auto_fixable,
            suggestion: self.suggestion,
            evaluate: self.evaluate,
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("auto_fixable", &self.auto_fixable)
            .finish()
    }
}

/// Ordered list of rules applied to one kind of subject
pub type RuleTable<T> = Vec<Rule<T>>;

/// One failed (or unevaluable) rule in a validation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFailure {
    pub rule: String,
    pub severity: RuleSeverity,
    pub message: String,
    pub auto_fixable: bool,
}
