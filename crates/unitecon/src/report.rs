//! Plain-text reports printed by the command-line front end.

use std::fmt::Write;

use unitecon_core::calculator::{breakeven_orders, ranked_channel_ltv_cac_ratios};
use unitecon_core::comparison::{Rating, Segment, build_comparison_rows, generate_verdicts};
use unitecon_core::format::{
    format_currency, format_count, format_months, format_percent, format_ratio,
};
use unitecon_core::health::{ScoreBand, sort_flags};
use unitecon_core::playbook::{executive_summary, generate_recommendations};
use unitecon_core::presets::Preset;
use unitecon_core::scenarios::{Scenario, apply_scenario, impact_summary};
use unitecon_core::sensitivity::{SweepPoint, TornadoRow, tornado_ranking};
use unitecon_core::waterfall::build_waterfall;
use unitecon_core::{Assumptions, Outputs, Severity};

const WIDTH: usize = 50;

fn rule(out: &mut String, c: char) {
    out.push_str(&c.to_string().repeat(WIDTH));
    out.push('\n');
}

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {:<24} {value}", format!("{label}:"));
}

fn flag_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "!!!",
        Severity::Warning => " ! ",
        Severity::Watch => " ~ ",
        Severity::Positive => " + ",
    }
}

/// The headline summary: inputs, outputs and health flags
pub fn render_summary(inputs: &Assumptions, outputs: &Outputs) -> String {
    let mut out = String::new();

    rule(&mut out, '=');
    out.push_str("  UNIT ECONOMICS SUMMARY\n");
    rule(&mut out, '=');

    line(&mut out, "Blended CAC", format_currency(inputs.blended_cac()));
    for channel in &inputs.channels {
        let _ = writeln!(
            out,
            "    {:<20}  CAC {:>9}  ({})",
            channel.name,
            format_currency(channel.cac),
            format_percent(channel.share, 0)
        );
    }
    if !inputs.channel_shares_balanced() {
        let _ = writeln!(
            out,
            "    (channel shares sum to {}, not 100%)",
            format_percent(inputs.channel_share_total(), 1)
        );
    }
    line(&mut out, "AOV", format_currency(inputs.aov));
    line(&mut out, "Orders/month", format!("{:.1}", inputs.orders_per_month));
    line(&mut out, "Gross margin", format_percent(inputs.gross_margin_pct, 0));
    line(
        &mut out,
        "Variable cost/order",
        format_currency(inputs.variable_cost_per_order),
    );
    line(&mut out, "Monthly churn", format_percent(inputs.monthly_churn_rate, 1));
    if inputs.arpu_growth_rate > 0.0 {
        line(&mut out, "ARPU growth", format_percent(inputs.arpu_growth_rate, 1));
    }

    rule(&mut out, '-');
    line(
        &mut out,
        "Contribution/order",
        format_currency(outputs.contribution_margin_per_order),
    );
    line(
        &mut out,
        "Monthly contribution",
        format_currency(outputs.monthly_contribution),
    );
    line(&mut out, "LTV", format_currency(outputs.ltv));
    line(&mut out, "Discounted LTV", format_currency(outputs.discounted_ltv));
    line(&mut out, "LTV:CAC ratio", format_ratio(outputs.ltv_cac_ratio, 2));
    line(
        &mut out,
        "Disc. LTV:CAC ratio",
        format_ratio(outputs.discounted_ltv_cac_ratio, 2),
    );
    line(&mut out, "Payback period", format_months(outputs.payback_months));
    if let Some(orders) = breakeven_orders(inputs) {
        line(&mut out, "Breakeven", format!("{} orders/month", format_count(orders)));
    }
    line(
        &mut out,
        "Health score",
        format!(
            "{}/100 ({})",
            outputs.health_score,
            ScoreBand::from_score(outputs.health_score).label()
        ),
    );

    if inputs.channels.len() > 1 {
        rule(&mut out, '-');
        out.push_str("  CHANNEL LTV:CAC (best first):\n");
        for ratio in ranked_channel_ltv_cac_ratios(inputs) {
            let _ = writeln!(
                out,
                "    {:<20}  {}",
                ratio.name,
                format_ratio(ratio.ltv_cac_ratio, 2)
            );
        }
    }

    rule(&mut out, '-');
    if outputs.health_flags.is_empty() {
        out.push_str("  No health flags; looking good!\n");
    } else {
        out.push_str("  FLAGS:\n");
        for flag in sort_flags(&outputs.health_flags) {
            let _ = writeln!(
                out,
                "  [{}] {}: {}",
                flag_icon(flag.severity),
                flag.severity.as_str().to_uppercase(),
                flag.message
            );
        }
    }
    rule(&mut out, '=');

    out
}

/// Per-order breakdown from AOV to contribution margin
pub fn render_waterfall(inputs: &Assumptions) -> String {
    let mut out = String::from("  PER-ORDER BREAKDOWN\n");
    for step in build_waterfall(inputs) {
        let _ = writeln!(out, "    {:<16} {:>12}", step.label, step.text);
    }
    out
}

/// Executive summary followed by numbered recommendations
pub fn render_playbook(inputs: &Assumptions, outputs: &Outputs, template_name: &str) -> String {
    let mut out = String::from("  EXECUTIVE SUMMARY\n");
    for text in executive_summary(inputs, outputs, template_name).lines() {
        let _ = writeln!(out, "    {text}");
    }

    let recs = generate_recommendations(outputs, &tornado_ranking(inputs, 0.10));
    if !recs.is_empty() {
        out.push_str("\n  RECOMMENDATIONS\n");
        for (i, rec) in recs.iter().enumerate() {
            let _ = writeln!(out, "    {}. {rec}", i + 1);
        }
    }
    out
}

pub fn render_tornado(rows: &[TornadoRow], improvement_pct: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  MOST SENSITIVE LEVERS ({} improvement)",
        format_percent(improvement_pct, 0)
    );
    let _ = writeln!(
        out,
        "    {:<16} {:>10} {:>10} {:>10}",
        "Lever", "Baseline", "Improved", "Impact"
    );
    for row in rows {
        let impact = if row.pct_delta.is_finite() {
            format!("{:+.1}%", row.pct_delta)
        } else {
            "n/a".to_string()
        };
        let _ = writeln!(
            out,
            "    {:<16} {:>10} {:>10} {:>10}",
            row.lever.label(),
            format_ratio(row.baseline, 2),
            format_ratio(row.improved, 2),
            impact
        );
    }
    out
}

pub fn render_sweep(label: &str, points: &[SweepPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {label} SWEEP");
    let _ = writeln!(out, "    {:>8} {:>12} {:>10}", "Change", "Value", "LTV:CAC");
    for point in points {
        let _ = writeln!(
            out,
            "    {:>8} {:>12.2} {:>10}",
            format!("{:+.0}%", point.pct_change * 100.0),
            point.value,
            format_ratio(point.ltv_cac_ratio, 2)
        );
    }
    out
}

/// Each scenario with its resulting score and a one-line impact summary
pub fn render_scenarios(inputs: &Assumptions, outputs: &Outputs, scenarios: &[Scenario]) -> String {
    let mut out = String::new();
    for scenario in scenarios {
        let (after_inputs, after) = apply_scenario(inputs, scenario);
        let _ = writeln!(
            out,
            "  {} (health {} -> {})",
            scenario.name, outputs.health_score, after.health_score
        );
        let _ = writeln!(out, "    {}", scenario.description);
        let _ = writeln!(
            out,
            "    {}",
            impact_summary(inputs, outputs, &after_inputs, &after)
        );
    }
    out
}

pub fn render_comparison(a: &Segment, b: &Segment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    {:<22} {:>14} {:>14}", "Metric", a.name, b.name);
    for row in build_comparison_rows(a, b) {
        let (rating_a, rating_b) = row.ratings();
        let _ = writeln!(
            out,
            "    {:<22} {:>14} {:>14}",
            row.metric.label(),
            format!("{} {}", row.metric.format(row.value_a), rating_marker(rating_a)),
            format!("{} {}", row.metric.format(row.value_b), rating_marker(rating_b)),
        );
    }
    out.push('\n');
    for verdict in generate_verdicts(a, b) {
        let _ = writeln!(out, "  - {verdict}");
    }
    out
}

fn rating_marker(rating: Rating) -> &'static str {
    match rating {
        Rating::Green => "(+)",
        Rating::Yellow => "(~)",
        Rating::Red => "(-)",
    }
}

pub fn render_presets() -> String {
    let mut out = String::new();
    for preset in Preset::ALL {
        let inputs = preset.assumptions();
        let _ = writeln!(out, "  {:<22} {}", preset.key(), preset.description());
        let _ = writeln!(
            out,
            "  {:<22} AOV {}, GM {}, churn {}/mo",
            "",
            format_currency(inputs.aov),
            format_percent(inputs.gross_margin_pct, 0),
            format_percent(inputs.monthly_churn_rate, 0)
        );
    }
    out
}
