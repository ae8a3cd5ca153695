//! Side-by-side comparison of two segments (e.g. two customer cohorts or two
//! markets) with traffic-light ratings and plain-English verdicts.

use serde::{Deserialize, Serialize};

use crate::calculator::compute;
use crate::format::{
    INFINITY_LABEL, format_currency, format_currency_short, format_percent, format_ratio,
};
use crate::health::{PAYBACK_CEILING_MONTHS, PAYBACK_FULL_MARKS_MONTHS};
use crate::model::{Assumptions, Outputs};

/// Margin or LTV must exceed the other side by this factor to be called out
const SIGNIFICANT_GAP: f64 = 1.5;

/// A named set of assumptions together with its computed outputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub name: String,
    pub inputs: Assumptions,
    pub outputs: Outputs,
}

impl Segment {
    #[must_use]
    pub fn new(name: impl Into<String>, inputs: Assumptions) -> Self {
        let outputs = compute(&inputs);
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Ltv,
    Cac,
    LtvCacRatio,
    PaybackMonths,
    ContributionMargin,
    HealthScore,
}

impl Metric {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ltv => "LTV",
            Self::Cac => "CAC",
            Self::LtvCacRatio => "LTV:CAC",
            Self::PaybackMonths => "Payback Period (mo)",
            Self::ContributionMargin => "Contribution Margin",
            Self::HealthScore => "Health Score",
        }
    }

    #[must_use]
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Self::Cac | Self::PaybackMonths)
    }

    /// Render a value of this metric for display
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Ltv | Self::Cac | Self::ContributionMargin => format_currency(value),
            Self::LtvCacRatio => format_ratio(value, 2),
            Self::PaybackMonths if value.is_finite() => format!("{value:.1}"),
            Self::PaybackMonths => INFINITY_LABEL.to_string(),
            Self::HealthScore => format!("{value:.0}/100"),
        }
    }
}

/// Traffic-light rating of a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Green,
    Yellow,
    Red,
}

/// Rate a single metric value against fixed thresholds
#[must_use]
pub fn cell_rating(metric: Metric, value: f64) -> Rating {
    match metric {
        Metric::Cac => lower_is_better(value, 50.0, 200.0),
        Metric::PaybackMonths => {
            lower_is_better(value, PAYBACK_FULL_MARKS_MONTHS, PAYBACK_CEILING_MONTHS)
        }
        Metric::Ltv => higher_is_better(value, 50.0, 200.0),
        Metric::LtvCacRatio => higher_is_better(value, 1.0, 3.0),
        Metric::ContributionMargin => higher_is_better(value, 0.0, 5.0),
        Metric::HealthScore => higher_is_better(value, 40.0, 70.0),
    }
}

fn lower_is_better(value: f64, green_at_most: f64, yellow_at_most: f64) -> Rating {
    if value <= green_at_most {
        Rating::Green
    } else if value <= yellow_at_most {
        Rating::Yellow
    } else {
        Rating::Red
    }
}

fn higher_is_better(value: f64, red_below: f64, green_at_least: f64) -> Rating {
    if value < red_below {
        Rating::Red
    } else if value >= green_at_least {
        Rating::Green
    } else {
        Rating::Yellow
    }
}

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: Metric,
    pub value_a: f64,
    pub value_b: f64,
}

impl MetricRow {
    #[must_use]
    pub fn ratings(&self) -> (Rating, Rating) {
        (
            cell_rating(self.metric, self.value_a),
            cell_rating(self.metric, self.value_b),
        )
    }
}

/// Headline metrics for two segments, in display order
#[must_use]
pub fn build_comparison_rows(a: &Segment, b: &Segment) -> Vec<MetricRow> {
    let row = |metric: Metric, get: fn(&Segment) -> f64| MetricRow {
        metric,
        value_a: get(a),
        value_b: get(b),
    };

    vec![
        row(Metric::Ltv, |s| s.outputs.ltv),
        row(Metric::Cac, |s| s.inputs.blended_cac()),
        row(Metric::LtvCacRatio, |s| s.outputs.ltv_cac_ratio),
        row(Metric::PaybackMonths, |s| s.outputs.payback_months),
        row(Metric::ContributionMargin, |s| {
            s.outputs.contribution_margin_per_order
        }),
        row(Metric::HealthScore, |s| f64::from(s.outputs.health_score)),
    ]
}

/// Plain-English observations about how two segments differ.
///
/// Always starts with the overall health verdict; trade-off and gap
/// observations follow only when they apply.
#[must_use]
pub fn generate_verdicts(a: &Segment, b: &Segment) -> Vec<String> {
    let mut verdicts = Vec::new();
    let (oa, ob) = (&a.outputs, &b.outputs);

    verdicts.push(match oa.health_score.cmp(&ob.health_score) {
        std::cmp::Ordering::Greater => format!(
            "{} has stronger overall unit economics (health score {} vs {}).",
            a.name, oa.health_score, ob.health_score
        ),
        std::cmp::Ordering::Less => format!(
            "{} has stronger overall unit economics (health score {} vs {}).",
            b.name, ob.health_score, oa.health_score
        ),
        std::cmp::Ordering::Equal => {
            format!("Both segments have equal health scores ({}).", oa.health_score)
        }
    });

    let a_better_ratio = oa.ltv_cac_ratio > ob.ltv_cac_ratio;
    let a_better_payback = oa.payback_months < ob.payback_months;
    if a_better_ratio && !a_better_payback {
        verdicts.push(value_vs_capital(a, b));
    } else if !a_better_ratio && a_better_payback {
        verdicts.push(value_vs_capital(b, a));
    }

    let (cac_a, cac_b) = (a.inputs.blended_cac(), b.inputs.blended_cac());
    let (churn_a, churn_b) = (a.inputs.monthly_churn_rate, b.inputs.monthly_churn_rate);
    if cac_a < cac_b && churn_a > churn_b {
        verdicts.push(cheap_but_leaky(a, b));
    } else if cac_b < cac_a && churn_b > churn_a {
        verdicts.push(cheap_but_leaky(b, a));
    }

    let (cm_a, cm_b) = (
        oa.contribution_margin_per_order,
        ob.contribution_margin_per_order,
    );
    if cm_a > cm_b * SIGNIFICANT_GAP {
        verdicts.push(margin_gap(&a.name, cm_a, cm_b));
    } else if cm_b > cm_a * SIGNIFICANT_GAP {
        verdicts.push(margin_gap(&b.name, cm_b, cm_a));
    }

    if oa.ltv > ob.ltv * SIGNIFICANT_GAP {
        verdicts.push(ltv_gap(&a.name, oa.ltv, ob.ltv));
    } else if ob.ltv > oa.ltv * SIGNIFICANT_GAP {
        verdicts.push(ltv_gap(&b.name, ob.ltv, oa.ltv));
    }

    verdicts
}

fn value_vs_capital(winner: &Segment, other: &Segment) -> String {
    format!(
        "{} creates more value per customer but requires more capital to scale \
         (LTV:CAC {:.2}x vs {:.2}x, payback {:.1} vs {:.1} months).",
        winner.name,
        winner.outputs.ltv_cac_ratio,
        other.outputs.ltv_cac_ratio,
        winner.outputs.payback_months,
        other.outputs.payback_months
    )
}

fn cheap_but_leaky(cheaper: &Segment, other: &Segment) -> String {
    format!(
        "{} is cheaper to acquire but has a retention problem \
         (CAC {} vs {}, churn {} vs {}).",
        cheaper.name,
        format_currency_short(cheaper.inputs.blended_cac()),
        format_currency_short(other.inputs.blended_cac()),
        format_percent(cheaper.inputs.monthly_churn_rate, 0),
        format_percent(other.inputs.monthly_churn_rate, 0)
    )
}

fn margin_gap(name: &str, higher: f64, lower: f64) -> String {
    format!(
        "{name} has significantly higher margins ({} vs {} per order).",
        format_currency(higher),
        format_currency(lower)
    )
}

fn ltv_gap(name: &str, higher: f64, lower: f64) -> String {
    format!(
        "{name} generates substantially more lifetime value ({} vs {}).",
        format_currency_short(higher),
        format_currency_short(lower)
    )
}
