//! Core unit economics calculations.
//!
//! Every function here is pure: it reads an [`Assumptions`] record and
//! returns a float. Degenerate inputs never raise; they resolve to the
//! sentinels documented on each function (`f64::INFINITY` meaning "never" or
//! "unbounded").

use serde::{Deserialize, Serialize};

use crate::health::{health_flags, health_score};
use crate::model::{Assumptions, Outputs};

/// Monthly rate equivalent to an annual rate under monthly compounding
#[must_use]
pub fn monthly_discount_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// `base^months` for a month index that may exceed `i32` range
#[must_use]
pub fn pow_months(base: f64, months: u64) -> f64 {
    match i32::try_from(months) {
        Ok(n) => base.powi(n),
        Err(_) => base.powf(months as f64),
    }
}

/// `AOV × gross margin − variable cost`. Negative for loss-making orders.
#[must_use]
pub fn contribution_margin_per_order(inputs: &Assumptions) -> f64 {
    inputs.aov * inputs.gross_margin_pct - inputs.variable_cost_per_order
}

/// Contribution margin per customer per month
#[must_use]
pub fn monthly_contribution(inputs: &Assumptions) -> f64 {
    contribution_margin_per_order(inputs) * inputs.orders_per_month
}

/// Customer lifetime value.
///
/// Without expansion revenue this is `monthly_contribution / churn`. With a
/// positive ARPU growth rate `g` the contribution is assumed to grow
/// linearly by `m = a × g` each month, giving the closed form
/// `a/c + m/c²`. That is a first-order approximation, not a geometric model.
///
/// Returns `+inf` when churn is zero or negative.
#[must_use]
pub fn ltv(inputs: &Assumptions) -> f64 {
    let churn = inputs.monthly_churn_rate;
    if churn <= 0.0 {
        return f64::INFINITY;
    }

    let a = monthly_contribution(inputs);
    if inputs.arpu_growth_rate > 0.0 {
        let m = a * inputs.arpu_growth_rate;
        a / churn + m / (churn * churn)
    } else {
        a / churn
    }
}

/// LTV over blended CAC. `+inf` when blended CAC is zero or negative.
#[must_use]
pub fn ltv_cac_ratio(inputs: &Assumptions) -> f64 {
    ratio_to_cac(ltv(inputs), inputs.blended_cac())
}

/// LTV:CAC for a single acquisition channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRatio {
    pub name: String,
    pub cac: f64,
    pub share: f64,
    #[serde(with = "crate::model::unbounded")]
    pub ltv_cac_ratio: f64,
}

/// Per-channel LTV:CAC, in input channel order.
///
/// The numerator is the same blended LTV for every channel; channels differ
/// only in what they cost to acquire through.
#[must_use]
pub fn channel_ltv_cac_ratios(inputs: &Assumptions) -> Vec<ChannelRatio> {
    let ltv = ltv(inputs);
    inputs
        .channels
        .iter()
        .map(|ch| ChannelRatio {
            name: ch.name.clone(),
            cac: ch.cac,
            share: ch.share,
            ltv_cac_ratio: ratio_to_cac(ltv, ch.cac),
        })
        .collect()
}

/// Per-channel LTV:CAC ranked best-first. Ties keep input order.
#[must_use]
pub fn ranked_channel_ltv_cac_ratios(inputs: &Assumptions) -> Vec<ChannelRatio> {
    let mut ratios = channel_ltv_cac_ratios(inputs);
    ratios.sort_by(|a, b| b.ltv_cac_ratio.total_cmp(&a.ltv_cac_ratio));
    ratios
}

/// Months of contribution needed to recover blended CAC.
/// `+inf` when monthly contribution is zero or negative.
#[must_use]
pub fn payback_months(inputs: &Assumptions) -> f64 {
    let mc = monthly_contribution(inputs);
    if mc <= 0.0 {
        return f64::INFINITY;
    }
    inputs.blended_cac() / mc
}

/// LTV from discounted monthly cash flows over the average lifetime.
///
/// The horizon is truncated at `round(1 / churn)` months (ties to even)
/// rather than summed to convergence. Month `t` contributes
/// `monthly_contribution × (1 − churn)^(t−1) / (1 + r)^t` where `r` is the
/// monthly equivalent of the annual discount rate. `+inf` when churn is zero
/// or negative.
#[must_use]
pub fn discounted_ltv(inputs: &Assumptions) -> f64 {
    let churn = inputs.monthly_churn_rate;
    if churn <= 0.0 {
        return f64::INFINITY;
    }

    let mc = monthly_contribution(inputs);
    let rate = monthly_discount_rate(inputs.annual_discount_rate);
    let horizon = (1.0 / churn).round_ties_even() as u64;

    (1..=horizon)
        .map(|t| {
            let survivors = pow_months(1.0 - churn, t - 1);
            survivors * mc / pow_months(1.0 + rate, t)
        })
        .sum()
}

/// Discounted LTV over blended CAC. `+inf` when blended CAC is zero or negative.
#[must_use]
pub fn discounted_ltv_cac_ratio(inputs: &Assumptions) -> f64 {
    ratio_to_cac(discounted_ltv(inputs), inputs.blended_cac())
}

/// Orders per month needed to cover fixed costs.
///
/// `None` unless both the contribution margin and fixed costs are positive.
#[must_use]
pub fn breakeven_orders(inputs: &Assumptions) -> Option<f64> {
    let cm = contribution_margin_per_order(inputs);
    (cm > 0.0 && inputs.monthly_fixed_costs > 0.0).then(|| inputs.monthly_fixed_costs / cm)
}

/// Run every calculation and assemble the full output bundle
#[must_use]
pub fn compute(inputs: &Assumptions) -> Outputs {
    let mut outputs = Outputs {
        contribution_margin_per_order: contribution_margin_per_order(inputs),
        monthly_contribution: monthly_contribution(inputs),
        ltv: ltv(inputs),
        discounted_ltv: discounted_ltv(inputs),
        ltv_cac_ratio: ltv_cac_ratio(inputs),
        discounted_ltv_cac_ratio: discounted_ltv_cac_ratio(inputs),
        payback_months: payback_months(inputs),
        health_score: 0,
        health_flags: Vec::new(),
    };

    outputs.health_flags = health_flags(inputs, &outputs);
    outputs.health_score = health_score(&outputs);
    outputs
}

fn ratio_to_cac(value: f64, cac: f64) -> f64 {
    if cac <= 0.0 {
        f64::INFINITY
    } else {
        value / cac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_store() -> Assumptions {
        Assumptions::builder()
            .aov(34.0)
            .orders_per_month(2.8)
            .gross_margin(0.30)
            .variable_cost(4.20)
            .churn(0.08)
            .fixed_costs(12_000.0)
            .channel("Paid", 25.0, 0.60)
            .channel("Organic", 8.0, 0.30)
            .channel("Referral", 4.0, 0.10)
            .build()
    }

    fn approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    #[test]
    fn test_dark_store_worked_example() {
        let inputs = dark_store();

        approx(contribution_margin_per_order(&inputs), 6.00, 1e-9);
        approx(monthly_contribution(&inputs), 16.80, 1e-9);
        approx(ltv(&inputs), 210.00, 1e-9);
        approx(inputs.blended_cac(), 17.80, 1e-9);
        approx(ltv_cac_ratio(&inputs), 11.80, 0.01);
        approx(payback_months(&inputs), 1.06, 0.01);
    }

    #[test]
    fn test_expansion_revenue_worked_example() {
        let inputs = Assumptions::builder()
            .aov(50.0)
            .orders_per_month(1.0)
            .gross_margin(0.80)
            .variable_cost(0.0)
            .churn(0.10)
            .arpu_growth(0.03)
            .cac(100.0)
            .build();

        // a = 40, m = 1.2: 40 / 0.10 + 1.2 / 0.01
        approx(monthly_contribution(&inputs), 40.0, 1e-12);
        approx(ltv(&inputs), 520.0, 1e-9);
        approx(ltv_cac_ratio(&inputs), 5.2, 1e-9);
    }

    #[test]
    fn test_contribution_margin_may_be_negative() {
        let inputs = Assumptions::builder()
            .aov(20.0)
            .gross_margin(0.15)
            .variable_cost(10.0)
            .orders_per_month(1.0)
            .churn(0.3)
            .build();

        assert_eq!(contribution_margin_per_order(&inputs), 20.0 * 0.15 - 10.0);
        assert!(contribution_margin_per_order(&inputs) < 0.0);
        assert_eq!(payback_months(&inputs), f64::INFINITY);
    }

    #[test]
    fn test_zero_churn_is_unbounded() {
        let inputs = Assumptions {
            monthly_churn_rate: 0.0,
            arpu_growth_rate: 0.05,
            ..dark_store()
        };

        assert_eq!(ltv(&inputs), f64::INFINITY);
        assert_eq!(discounted_ltv(&inputs), f64::INFINITY);
        assert_eq!(ltv_cac_ratio(&inputs), f64::INFINITY);
    }

    #[test]
    fn test_free_acquisition_is_unbounded_ratio() {
        let inputs = Assumptions {
            channels: Vec::new(),
            ..dark_store()
        };

        assert_eq!(ltv_cac_ratio(&inputs), f64::INFINITY);
        assert_eq!(discounted_ltv_cac_ratio(&inputs), f64::INFINITY);
        assert_eq!(payback_months(&inputs), 0.0);
    }

    #[test]
    fn test_ratio_is_ltv_over_blended_cac() {
        let inputs = dark_store();
        assert_eq!(ltv_cac_ratio(&inputs), ltv(&inputs) / inputs.blended_cac());
    }

    #[test]
    fn test_channel_ratios_share_blended_ltv() {
        let inputs = dark_store();
        let ltv = ltv(&inputs);
        let ratios = channel_ltv_cac_ratios(&inputs);

        let names: Vec<&str> = ratios.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Paid", "Organic", "Referral"]);
        for (ratio, channel) in ratios.iter().zip(&inputs.channels) {
            assert_eq!(ratio.ltv_cac_ratio, ltv / channel.cac);
        }
    }

    #[test]
    fn test_ranked_channel_ratios() {
        let mut inputs = dark_store();
        inputs.channels.push(crate::model::Channel::new("Partners", 0.0, 0.0));

        let ranked = ranked_channel_ltv_cac_ratios(&inputs);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Partners", "Referral", "Organic", "Paid"]);
        assert_eq!(ranked[0].ltv_cac_ratio, f64::INFINITY);
    }

    #[test]
    fn test_pow_months_beyond_i32_range() {
        let past_i32 = u64::from(u32::MAX) + 1;
        assert_eq!(pow_months(0.5, past_i32), 0.0);
        assert_eq!(pow_months(1.0, past_i32), 1.0);

        let decayed = pow_months(1.0 - 1e-12, 3_000_000_000);
        assert!((decayed - (-0.003_f64).exp()).abs() < 1e-6);
        assert_eq!(pow_months(1.08, 12), 1.08_f64.powi(12));
    }

    #[test]
    fn test_discounted_ltv_below_undiscounted() {
        let inputs = dark_store();
        let discounted = discounted_ltv(&inputs);

        assert!(discounted > 0.0);
        assert!(discounted < ltv(&inputs));
    }

    #[test]
    fn test_discounted_ltv_horizon_is_rounded_lifetime() {
        // churn 0.4 => 1/0.4 = 2.5 rounds to 2 months
        let inputs = Assumptions::builder()
            .aov(10.0)
            .orders_per_month(1.0)
            .gross_margin(1.0)
            .churn(0.4)
            .discount_rate(0.0)
            .build();

        // 10 + 10×0.6
        approx(discounted_ltv(&inputs), 16.0, 1e-9);
    }

    #[test]
    fn test_monthly_discount_rate_compounds_to_annual() {
        let monthly = monthly_discount_rate(0.10);
        approx((1.0 + monthly).powi(12), 1.10, 1e-12);
        assert_eq!(monthly_discount_rate(0.0), 0.0);
    }

    #[test]
    fn test_breakeven_orders() {
        let inputs = dark_store();
        approx(breakeven_orders(&inputs).unwrap(), 2_000.0, 1e-6);

        let no_fixed = Assumptions {
            monthly_fixed_costs: 0.0,
            ..dark_store()
        };
        assert_eq!(breakeven_orders(&no_fixed), None);

        let losing = Assumptions {
            variable_cost_per_order: 20.0,
            ..dark_store()
        };
        assert_eq!(breakeven_orders(&losing), None);
    }

    #[test]
    fn test_compute_assembles_bundle() {
        let inputs = dark_store();
        let outputs = compute(&inputs);

        assert_eq!(outputs.ltv, ltv(&inputs));
        assert_eq!(outputs.payback_months, payback_months(&inputs));
        assert_eq!(
            outputs.discounted_ltv_cac_ratio,
            discounted_ltv(&inputs) / inputs.blended_cac()
        );
        assert_eq!(outputs.health_score, 100);
        assert!(outputs.health_flags.is_empty());
    }
}
