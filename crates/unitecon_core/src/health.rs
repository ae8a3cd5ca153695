//! Health diagnostics: rule-based flags and a 0–100 composite score.
//!
//! # Scoring
//!
//! The score is the sum of four sub-scores worth up to 25 points each. The
//! breakpoints are fixed constants of the model and are not configurable:
//!
//! | component            | 25 points at | 0 points at | shape between          |
//! |----------------------|--------------|-------------|------------------------|
//! | LTV:CAC              | ≥ 3.0        | < 1.0       | linear from 1.0 to 3.0 |
//! | payback (months)     | ≤ 6          | > 18        | linear from 6 to 18    |
//! | CM per order ($)     | ≥ 5          | ≤ 0         | proportional to cm/5   |
//! | monthly contribution | ≥ 15         | ≤ 0         | proportional to mc/15  |

use serde::{Deserialize, Serialize};

use crate::calculator::contribution_margin_per_order;
use crate::format::format_percent;
use crate::model::{Assumptions, HealthFlag, Outputs, Severity};

/// Points available per score component
pub const COMPONENT_POINTS: f64 = 25.0;

pub const RATIO_FULL_MARKS: f64 = 3.0;
pub const RATIO_FLOOR: f64 = 1.0;
pub const PAYBACK_FULL_MARKS_MONTHS: f64 = 6.0;
pub const PAYBACK_CEILING_MONTHS: f64 = 18.0;
pub const MARGIN_BENCHMARK: f64 = 5.0;
pub const MONTHLY_CONTRIBUTION_BENCHMARK: f64 = 15.0;

/// Contribution margin below this share of AOV is flagged as thin
pub const THIN_MARGIN_PCT: f64 = 0.10;
/// Monthly churn above this is flagged as a retention risk
pub const HIGH_CHURN_RATE: f64 = 0.10;

/// Evaluate every health rule. Rules are independent and may all fire.
#[must_use]
pub fn health_flags(inputs: &Assumptions, outputs: &Outputs) -> Vec<HealthFlag> {
    let mut flags = Vec::new();

    if outputs.ltv_cac_ratio < RATIO_FLOOR {
        flags.push(HealthFlag::new(
            Severity::Critical,
            format!(
                "LTV:CAC ratio is {:.2} (< 1.0); you lose money on every customer",
                outputs.ltv_cac_ratio
            ),
        ));
    }

    if outputs.payback_months > PAYBACK_CEILING_MONTHS {
        flags.push(HealthFlag::new(
            Severity::Warning,
            format!(
                "Payback period is {:.1} months (> 18); slow capital recovery",
                outputs.payback_months
            ),
        ));
    }

    let cm_pct = if inputs.aov > 0.0 {
        contribution_margin_per_order(inputs) / inputs.aov
    } else {
        0.0
    };
    if cm_pct < THIN_MARGIN_PCT {
        flags.push(HealthFlag::new(
            Severity::Warning,
            format!(
                "Contribution margin is {} of AOV (< 10%); thin margins",
                format_percent(cm_pct, 1)
            ),
        ));
    }

    if inputs.monthly_churn_rate > HIGH_CHURN_RATE {
        flags.push(HealthFlag::new(
            Severity::Watch,
            format!(
                "Monthly churn is {} (> 10%); retention risk",
                format_percent(inputs.monthly_churn_rate, 1)
            ),
        ));
    }

    if inputs.arpu_growth_rate > inputs.monthly_churn_rate {
        flags.push(HealthFlag::new(
            Severity::Positive,
            format!(
                "Expansion revenue ({}/mo) outpaces churn ({}/mo); negative net churn",
                format_percent(inputs.arpu_growth_rate, 1),
                format_percent(inputs.monthly_churn_rate, 1)
            ),
        ));
    }

    flags
}

/// Composite health score in `0..=100`
#[must_use]
pub fn health_score(outputs: &Outputs) -> u8 {
    let score = ratio_component(outputs.ltv_cac_ratio)
        + payback_component(outputs.payback_months)
        + benchmark_component(outputs.contribution_margin_per_order, MARGIN_BENCHMARK)
        + benchmark_component(outputs.monthly_contribution, MONTHLY_CONTRIBUTION_BENCHMARK);

    score.round_ties_even().clamp(0.0, 100.0) as u8
}

fn ratio_component(ratio: f64) -> f64 {
    if ratio >= RATIO_FULL_MARKS {
        COMPONENT_POINTS
    } else if ratio >= RATIO_FLOOR {
        COMPONENT_POINTS * (ratio - RATIO_FLOOR) / (RATIO_FULL_MARKS - RATIO_FLOOR)
    } else {
        0.0
    }
}

fn payback_component(months: f64) -> f64 {
    if months <= PAYBACK_FULL_MARKS_MONTHS {
        COMPONENT_POINTS
    } else if months <= PAYBACK_CEILING_MONTHS {
        COMPONENT_POINTS * (PAYBACK_CEILING_MONTHS - months)
            / (PAYBACK_CEILING_MONTHS - PAYBACK_FULL_MARKS_MONTHS)
    } else {
        0.0
    }
}

fn benchmark_component(value: f64, benchmark: f64) -> f64 {
    if value >= benchmark {
        COMPONENT_POINTS
    } else if value > 0.0 {
        COMPONENT_POINTS * (value / benchmark).min(1.0)
    } else {
        0.0
    }
}

/// Display ordering of severities
const SEVERITY_ORDER: [Severity; 4] = [
    Severity::Positive,
    Severity::Critical,
    Severity::Warning,
    Severity::Watch,
];

/// Sort flags for display: positive first, then critical, warning, watch.
/// Flags of equal severity keep their relative order.
#[must_use]
pub fn sort_flags(flags: &[HealthFlag]) -> Vec<HealthFlag> {
    let rank = |severity: Severity| {
        SEVERITY_ORDER
            .iter()
            .position(|s| *s == severity)
            .unwrap_or(SEVERITY_ORDER.len())
    };

    let mut sorted = flags.to_vec();
    sorted.sort_by_key(|flag| rank(flag.severity));
    sorted
}

/// Coarse banding of the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Healthy,
    Fair,
    Poor,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => Self::Healthy,
            40..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}
