//! Per-order waterfall: how AOV breaks down into contribution margin.

use serde::{Deserialize, Serialize};

use crate::calculator::contribution_margin_per_order;
use crate::format::format_currency;
use crate::model::Assumptions;

/// How a waterfall bar relates to the running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Sets the running total
    Absolute,
    /// Adds to the running total
    Relative,
    /// Shows the running total; its own value is ignored
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: &'static str,
    pub value: f64,
    pub measure: Measure,
    /// Display label for the bar, e.g. "-$23.80"
    pub text: String,
}

/// Revenue, COGS, gross profit, variable costs, CM per order
#[must_use]
pub fn build_waterfall(inputs: &Assumptions) -> Vec<WaterfallStep> {
    let revenue = inputs.aov;
    let cogs = inputs.aov * (1.0 - inputs.gross_margin_pct);
    let variable_cost = inputs.variable_cost_per_order;
    let cm = contribution_margin_per_order(inputs);

    vec![
        WaterfallStep {
            label: "Revenue (AOV)",
            value: revenue,
            measure: Measure::Absolute,
            text: format_currency(revenue),
        },
        WaterfallStep {
            label: "COGS",
            value: -cogs,
            measure: Measure::Relative,
            text: format!("-{}", format_currency(cogs)),
        },
        WaterfallStep {
            label: "Gross Profit",
            value: 0.0,
            measure: Measure::Total,
            text: format_currency(revenue - cogs),
        },
        WaterfallStep {
            label: "Variable Costs",
            value: -variable_cost,
            measure: Measure::Relative,
            text: format!("-{}", format_currency(variable_cost)),
        },
        WaterfallStep {
            label: "CM / Order",
            value: 0.0,
            measure: Measure::Total,
            text: format_currency(cm),
        },
    ]
}

/// Running total after each step, resolving `Total` bars
#[must_use]
pub fn running_totals(steps: &[WaterfallStep]) -> Vec<f64> {
    let mut total = 0.0;
    steps
        .iter()
        .map(|step| {
            match step.measure {
                Measure::Absolute => total = step.value,
                Measure::Relative => total += step.value,
                Measure::Total => {}
            }
            total
        })
        .collect()
}
