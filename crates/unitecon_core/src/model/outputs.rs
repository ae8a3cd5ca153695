//! Calculator outputs and health diagnostics

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a health flag is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Losing money on every customer
    Critical,
    Warning,
    /// Not yet a problem, but trending toward one
    Watch,
    /// Something going notably right
    Positive,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Watch => "watch",
            Self::Positive => "positive",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic produced by the health evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFlag {
    pub severity: Severity,
    pub message: String,
}

impl HealthFlag {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Everything derived from one [`Assumptions`](super::Assumptions) record.
///
/// Fields that can be infinite serialize through [`super::unbounded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    pub contribution_margin_per_order: f64,
    pub monthly_contribution: f64,
    #[serde(with = "super::unbounded")]
    pub ltv: f64,
    #[serde(with = "super::unbounded")]
    pub discounted_ltv: f64,
    #[serde(with = "super::unbounded")]
    pub ltv_cac_ratio: f64,
    #[serde(with = "super::unbounded")]
    pub discounted_ltv_cac_ratio: f64,
    #[serde(with = "super::unbounded")]
    pub payback_months: f64,
    /// Composite score, 0..=100
    pub health_score: u8,
    #[serde(default)]
    pub health_flags: Vec<HealthFlag>,
}

impl Outputs {
    /// Flags of a given severity
    pub fn flags_with(&self, severity: Severity) -> impl Iterator<Item = &HealthFlag> {
        self.health_flags
            .iter()
            .filter(move |flag| flag.severity == severity)
    }

    #[must_use]
    pub fn has_flag(&self, severity: Severity) -> bool {
        self.flags_with(severity).next().is_some()
    }
}
