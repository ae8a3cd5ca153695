//! Pre-built what-if scenarios and plain-English impact summaries.

use crate::calculator::{breakeven_orders, compute};
use crate::format::{format_count, format_currency};
use crate::model::{Assumptions, Outputs};

/// A named transformation of the assumptions
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    /// Must return a new record and leave its argument untouched
    pub apply: fn(&Assumptions) -> Assumptions,
}

fn aov_up_15(inputs: &Assumptions) -> Assumptions {
    Assumptions {
        aov: inputs.aov * 1.15,
        ..inputs.clone()
    }
}

fn delivery_cost_drop(inputs: &Assumptions) -> Assumptions {
    Assumptions {
        variable_cost_per_order: (inputs.variable_cost_per_order - 1.50).max(0.0),
        ..inputs.clone()
    }
}

fn batch_two_orders(inputs: &Assumptions) -> Assumptions {
    Assumptions {
        variable_cost_per_order: inputs.variable_cost_per_order * 0.5,
        ..inputs.clone()
    }
}

// Doubled shrink costs about three points of gross margin
fn spoilage_doubles(inputs: &Assumptions) -> Assumptions {
    let shrink = inputs.gross_margin_pct.min(0.03);
    Assumptions {
        gross_margin_pct: inputs.gross_margin_pct - shrink,
        ..inputs.clone()
    }
}

fn churn_to_5(inputs: &Assumptions) -> Assumptions {
    Assumptions {
        monthly_churn_rate: 0.05,
        ..inputs.clone()
    }
}

fn churn_halved(inputs: &Assumptions) -> Assumptions {
    Assumptions {
        monthly_churn_rate: inputs.monthly_churn_rate * 0.5,
        ..inputs.clone()
    }
}

static DEFAULT_SCENARIOS: [Scenario; 6] = [
    Scenario {
        name: "AOV +15%",
        description: "What if average order value increases 15%?",
        apply: aov_up_15,
    },
    Scenario {
        name: "Delivery cost -$1.50",
        description: "What if delivery cost drops $1.50 per order?",
        apply: delivery_cost_drop,
    },
    Scenario {
        name: "Batch 2 orders per run",
        description: "What if you batch 2 orders per delivery run, halving variable cost?",
        apply: batch_two_orders,
    },
    Scenario {
        name: "Spoilage doubles",
        description: "What if spoilage/shrink doubles, reducing gross margin?",
        apply: spoilage_doubles,
    },
    Scenario {
        name: "Churn drops to 5%",
        description: "What if monthly churn drops to 5%?",
        apply: churn_to_5,
    },
    Scenario {
        name: "Churn halved",
        description: "What if churn rate is cut in half?",
        apply: churn_halved,
    },
];

/// The built-in scenario catalog, in display order
#[must_use]
pub fn default_scenarios() -> &'static [Scenario] {
    &DEFAULT_SCENARIOS
}

/// Look up a built-in scenario by name (case-insensitive)
#[must_use]
pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    let wanted = name.trim();
    default_scenarios()
        .iter()
        .find(|scenario| scenario.name.eq_ignore_ascii_case(wanted))
}

/// Apply a scenario and recompute. `inputs` is left untouched.
#[must_use]
pub fn apply_scenario(inputs: &Assumptions, scenario: &Scenario) -> (Assumptions, Outputs) {
    tracing::debug!(scenario = scenario.name, "applying scenario");
    let changed = (scenario.apply)(inputs);
    let outputs = compute(&changed);
    (changed, outputs)
}

/// Describe how a change moved margin, breakeven volume and LTV:CAC.
///
/// The LTV:CAC clause is left out when either side is unbounded.
#[must_use]
pub fn impact_summary(
    before_inputs: &Assumptions,
    before: &Outputs,
    after_inputs: &Assumptions,
    after: &Outputs,
) -> String {
    let cm_before = before.contribution_margin_per_order;
    let cm_after = after.contribution_margin_per_order;

    let mut parts = Vec::new();

    if cm_after > cm_before {
        parts.push(format!(
            "Contribution margin improves from {} to {} per order",
            format_currency(cm_before),
            format_currency(cm_after)
        ));
    } else if cm_after < cm_before {
        parts.push(format!(
            "Contribution margin drops from {} to {} per order",
            format_currency(cm_before),
            format_currency(cm_after)
        ));
    } else {
        parts.push("No change in contribution margin per order".to_string());
    }

    match breakeven_orders(before_inputs) {
        Some(be_before) if cm_after > 0.0 => parts.push(format!(
            "reaching breakeven at {} orders/month instead of {}",
            format_count(after_inputs.monthly_fixed_costs / cm_after),
            format_count(be_before)
        )),
        Some(_) => parts.push("breakeven is no longer achievable".to_string()),
        None => {
            if let Some(be_after) = breakeven_orders(after_inputs) {
                parts.push(format!(
                    "breakeven now possible at {} orders/month",
                    format_count(be_after)
                ));
            }
        }
    }

    if before.ltv_cac_ratio.is_finite() && after.ltv_cac_ratio.is_finite() {
        parts.push(format!(
            "LTV:CAC moves from {:.1}x to {:.1}x",
            before.ltv_cac_ratio, after.ltv_cac_ratio
        ));
    }

    parts.join(", ") + "."
}
