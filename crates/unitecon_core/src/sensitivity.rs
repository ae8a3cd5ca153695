//! Sensitivity analysis: how much each input lever moves LTV:CAC.
//!
//! Two views are provided:
//!
//! - [`tornado_ranking`] nudges every lever by the same percentage in its
//!   "improving" direction and ranks levers by impact.
//! - [`sweep`] walks a single lever across a symmetric percentage range to
//!   trace its response curve.
//!
//! Levers never mutate the caller's record; each perturbation builds a new
//! [`Assumptions`] with one field overridden.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculator::ltv_cac_ratio;
use crate::model::{Assumptions, Channel, LEGACY_CHANNEL_NAME};

/// Which way a lever has to move for the business to improve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverDirection {
    /// Lower is better (costs, churn)
    Cost,
    /// Higher is better (revenue drivers)
    Benefit,
}

impl LeverDirection {
    /// Sign applied to an improvement percentage
    #[must_use]
    pub fn sign(&self) -> f64 {
        match self {
            Self::Cost => -1.0,
            Self::Benefit => 1.0,
        }
    }
}

/// An input that sensitivity analysis can perturb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lever {
    Cac,
    Aov,
    OrdersPerMonth,
    GrossMargin,
    VariableCost,
    ChurnRate,
}

impl Lever {
    pub const ALL: [Lever; 6] = [
        Lever::Cac,
        Lever::Aov,
        Lever::OrdersPerMonth,
        Lever::GrossMargin,
        Lever::VariableCost,
        Lever::ChurnRate,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cac => "CAC",
            Self::Aov => "AOV",
            Self::OrdersPerMonth => "Orders/mo",
            Self::GrossMargin => "Gross Margin",
            Self::VariableCost => "Variable Cost",
            Self::ChurnRate => "Churn Rate",
        }
    }

    #[must_use]
    pub fn direction(&self) -> LeverDirection {
        match self {
            Self::Cac | Self::VariableCost | Self::ChurnRate => LeverDirection::Cost,
            Self::Aov | Self::OrdersPerMonth | Self::GrossMargin => LeverDirection::Benefit,
        }
    }

    /// Parse a lever from its label or snake_case name (case-insensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|lever| {
            lever.label().to_ascii_lowercase() == wanted || lever.key() == wanted
        })
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Cac => "cac",
            Self::Aov => "aov",
            Self::OrdersPerMonth => "orders_per_month",
            Self::GrossMargin => "gross_margin",
            Self::VariableCost => "variable_cost",
            Self::ChurnRate => "churn_rate",
        }
    }

    /// Current value of the lever. For CAC this is the blended CAC.
    #[must_use]
    pub fn value(&self, inputs: &Assumptions) -> f64 {
        match self {
            Self::Cac => inputs.blended_cac(),
            Self::Aov => inputs.aov,
            Self::OrdersPerMonth => inputs.orders_per_month,
            Self::GrossMargin => inputs.gross_margin_pct,
            Self::VariableCost => inputs.variable_cost_per_order,
            Self::ChurnRate => inputs.monthly_churn_rate,
        }
    }

    /// Copy of `inputs` with this lever set to `value`.
    ///
    /// For CAC the channel CACs are rescaled proportionally so that blended
    /// CAC equals `value`. A record with no paid acquisition gets a single
    /// blended channel instead.
    #[must_use]
    pub fn with_value(&self, inputs: &Assumptions, value: f64) -> Assumptions {
        match self {
            Self::Cac => {
                let current = inputs.blended_cac();
                if current > 0.0 {
                    self.scaled(inputs, value / current - 1.0)
                } else {
                    Assumptions {
                        channels: vec![Channel::new(LEGACY_CHANNEL_NAME, value, 1.0)],
                        ..inputs.clone()
                    }
                }
            }
            Self::Aov => Assumptions {
                aov: value,
                ..inputs.clone()
            },
            Self::OrdersPerMonth => Assumptions {
                orders_per_month: value,
                ..inputs.clone()
            },
            Self::GrossMargin => Assumptions {
                gross_margin_pct: value,
                ..inputs.clone()
            },
            Self::VariableCost => Assumptions {
                variable_cost_per_order: value,
                ..inputs.clone()
            },
            Self::ChurnRate => Assumptions {
                monthly_churn_rate: value,
                ..inputs.clone()
            },
        }
    }

    /// Copy of `inputs` with this lever scaled by `(1 + pct_change)`.
    ///
    /// The CAC lever scales every channel's CAC, which scales blended CAC by
    /// the same factor and leaves channel shares untouched.
    #[must_use]
    pub fn scaled(&self, inputs: &Assumptions, pct_change: f64) -> Assumptions {
        let factor = 1.0 + pct_change;
        match self {
            Self::Cac => Assumptions {
                channels: inputs
                    .channels
                    .iter()
                    .map(|ch| Channel {
                        cac: ch.cac * factor,
                        ..ch.clone()
                    })
                    .collect(),
                ..inputs.clone()
            },
            Self::Aov => Assumptions {
                aov: inputs.aov * factor,
                ..inputs.clone()
            },
            Self::OrdersPerMonth => Assumptions {
                orders_per_month: inputs.orders_per_month * factor,
                ..inputs.clone()
            },
            Self::GrossMargin => Assumptions {
                gross_margin_pct: inputs.gross_margin_pct * factor,
                ..inputs.clone()
            },
            Self::VariableCost => Assumptions {
                variable_cost_per_order: inputs.variable_cost_per_order * factor,
                ..inputs.clone()
            },
            Self::ChurnRate => Assumptions {
                monthly_churn_rate: inputs.monthly_churn_rate * factor,
                ..inputs.clone()
            },
        }
    }
}

/// Impact of improving one lever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoRow {
    pub lever: Lever,
    #[serde(with = "crate::model::unbounded")]
    pub baseline: f64,
    #[serde(with = "crate::model::unbounded")]
    pub improved: f64,
    #[serde(with = "crate::model::unbounded")]
    pub delta: f64,
    /// Change relative to baseline, in percent (0 when baseline is 0)
    #[serde(with = "crate::model::unbounded")]
    pub pct_delta: f64,
}

/// Rank every lever by how much a `improvement_pct` improvement moves
/// LTV:CAC.
///
/// Cost levers are decreased, benefit levers increased. Rows are sorted by
/// absolute delta, largest first; equal deltas keep [`Lever::ALL`] order and
/// undefined (NaN) deltas sort last.
#[must_use]
pub fn tornado_ranking(inputs: &Assumptions, improvement_pct: f64) -> Vec<TornadoRow> {
    let baseline = ltv_cac_ratio(inputs);

    let mut rows: Vec<TornadoRow> = Lever::ALL
        .iter()
        .map(|lever| {
            let tweaked = lever.scaled(inputs, lever.direction().sign() * improvement_pct);
            let improved = ltv_cac_ratio(&tweaked);
            let delta = improved - baseline;
            let pct_delta = if baseline != 0.0 {
                delta / baseline * 100.0
            } else {
                0.0
            };

            TornadoRow {
                lever: *lever,
                baseline,
                improved,
                delta,
                pct_delta,
            }
        })
        .collect();

    rows.sort_by(|a, b| rank_key(b.delta).total_cmp(&rank_key(a.delta)));
    rows
}

fn rank_key(delta: f64) -> f64 {
    if delta.is_nan() { -1.0 } else { delta.abs() }
}

/// One point on a single-lever response curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Offset applied to the lever (0.10 = +10%)
    pub pct_change: f64,
    /// Lever value at this point
    pub value: f64,
    #[serde(with = "crate::model::unbounded")]
    pub ltv_cac_ratio: f64,
}

/// `n_points` evenly spaced offsets from `-pct_range` to `+pct_range`
/// inclusive
#[must_use]
pub fn sweep_offsets(pct_range: f64, n_points: usize) -> Vec<f64> {
    match n_points {
        0 => Vec::new(),
        1 => vec![-pct_range],
        _ => {
            let step = 2.0 * pct_range / (n_points - 1) as f64;
            (0..n_points)
                .map(|i| -pct_range + step * i as f64)
                .collect()
        }
    }
}

/// Sweep one lever across `±pct_range` and compute LTV:CAC at each point.
///
/// Points are evaluated in parallel when the `parallel` feature is enabled
/// and are always returned in offset order.
#[must_use]
pub fn sweep(inputs: &Assumptions, lever: Lever, pct_range: f64, n_points: usize) -> Vec<SweepPoint> {
    let offsets = sweep_offsets(pct_range, n_points);
    tracing::debug!(lever = lever.label(), pct_range, n_points, "running lever sweep");

    let evaluate = |pct_change: &f64| {
        let tweaked = lever.scaled(inputs, *pct_change);
        SweepPoint {
            pct_change: *pct_change,
            value: lever.value(&tweaked),
            ltv_cac_ratio: ltv_cac_ratio(&tweaked),
        }
    };

    #[cfg(feature = "parallel")]
    let points = offsets.par_iter().map(evaluate).collect();

    #[cfg(not(feature = "parallel"))]
    let points = offsets.iter().map(evaluate).collect();

    points
}
