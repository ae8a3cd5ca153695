//! Action-oriented text: recommendations and an executive summary.

use crate::calculator::breakeven_orders;
use crate::format::{format_count, format_currency, format_ratio};
use crate::model::{Assumptions, Outputs, Severity};
use crate::sensitivity::TornadoRow;

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Number of top tornado levers turned into recommendations
const TOP_LEVERS: usize = 2;

/// Up to three recommendations: the two most sensitive levers from a tornado
/// ranking, then the first critical or warning flag.
///
/// `tornado` is expected in ranked order as returned by
/// [`tornado_ranking`](crate::sensitivity::tornado_ranking).
#[must_use]
pub fn generate_recommendations(outputs: &Outputs, tornado: &[TornadoRow]) -> Vec<String> {
    let mut recs: Vec<String> = tornado
        .iter()
        .take(TOP_LEVERS)
        .map(|row| {
            let direction = if row.pct_delta > 0.0 {
                "improvement"
            } else {
                "change"
            };
            format!(
                "Your biggest lever is {}. A 10% {direction} would shift LTV:CAC by {:+.1}%. \
                 Focus optimization efforts here.",
                row.lever.label(),
                row.pct_delta
            )
        })
        .collect();

    let urgent = outputs
        .health_flags
        .iter()
        .find(|flag| matches!(flag.severity, Severity::Critical | Severity::Warning));
    if let Some(flag) = urgent {
        let prefix = match flag.severity {
            Severity::Critical => "Urgent fix needed",
            _ => "Watch out",
        };
        recs.push(format!("{prefix}: {}", flag.message));
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

/// Multi-line plain-text summary of the headline numbers
#[must_use]
pub fn executive_summary(inputs: &Assumptions, outputs: &Outputs, template_name: &str) -> String {
    let cm = outputs.contribution_margin_per_order;
    let cm_pct = if inputs.aov > 0.0 {
        cm / inputs.aov * 100.0
    } else {
        0.0
    };
    let payback = if outputs.payback_months.is_finite() {
        format!("{:.1} months", outputs.payback_months)
    } else {
        "infinite".to_string()
    };
    let breakeven = breakeven_orders(inputs)
        .map(|orders| format!("{} orders/month", format_count(orders)))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Business type: {template_name}\n\
         Contribution margin: {}/order ({cm_pct:.1}% of AOV)\n\
         LTV: {}  |  LTV:CAC: {}\n\
         Payback period: {payback}\n\
         Breakeven: {breakeven}\n\
         Health score: {}/100",
        format_currency(cm),
        format_currency(outputs.ltv),
        format_ratio(outputs.ltv_cac_ratio, 1),
        outputs.health_score
    )
}
