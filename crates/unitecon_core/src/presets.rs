//! Starting templates for common marketplace archetypes.

use serde::{Deserialize, Serialize};

use crate::model::{Assumptions, Channel};

/// Business archetype with sensible default assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    DeliveryMarketplace,
    SaasMarketplace,
    ServicesMarketplace,
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::DeliveryMarketplace,
        Preset::SaasMarketplace,
        Preset::ServicesMarketplace,
        Preset::Custom,
    ];

    /// Display name, also used as the business type in summaries
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeliveryMarketplace => "Delivery Marketplace",
            Self::SaasMarketplace => "SaaS Marketplace",
            Self::ServicesMarketplace => "Services Marketplace",
            Self::Custom => "Custom",
        }
    }

    /// Kebab-case identifier used on the command line
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::DeliveryMarketplace => "delivery-marketplace",
            Self::SaasMarketplace => "saas-marketplace",
            Self::ServicesMarketplace => "services-marketplace",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::DeliveryMarketplace => {
                "Quick commerce or food delivery: frequent small baskets, thin margins, paid acquisition."
            }
            Self::SaasMarketplace => {
                "Subscription platform: one charge a month, high gross margin, expansion revenue."
            }
            Self::ServicesMarketplace => {
                "Booked services: large tickets, infrequent orders, take-rate margins."
            }
            Self::Custom => "Start from neutral defaults and enter your own numbers.",
        }
    }

    /// Parse by key or display name (case-insensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL.into_iter().find(|preset| {
            preset.key().eq_ignore_ascii_case(wanted) || preset.name().eq_ignore_ascii_case(wanted)
        })
    }

    /// Default assumptions for this archetype
    #[must_use]
    pub fn assumptions(&self) -> Assumptions {
        match self {
            Self::DeliveryMarketplace => Assumptions::builder()
                .aov(34.0)
                .orders_per_month(2.8)
                .gross_margin(0.30)
                .variable_cost(4.20)
                .churn(0.08)
                .fixed_costs(12_000.0)
                .channel("Paid Social", 25.0, 0.60)
                .channel("Organic", 8.0, 0.30)
                .channel("Referral", 4.0, 0.10)
                .build(),
            Self::SaasMarketplace => Assumptions::builder()
                .aov(50.0)
                .orders_per_month(1.0)
                .gross_margin(0.80)
                .variable_cost(0.0)
                .churn(0.05)
                .arpu_growth(0.01)
                .fixed_costs(25_000.0)
                .channel("Paid Search", 180.0, 0.50)
                .channel("Content", 60.0, 0.35)
                .channel("Partners", 120.0, 0.15)
                .build(),
            Self::ServicesMarketplace => Assumptions::builder()
                .aov(120.0)
                .orders_per_month(0.6)
                .gross_margin(0.20)
                .variable_cost(6.0)
                .churn(0.06)
                .fixed_costs(8_000.0)
                .channel("Paid Search", 45.0, 0.70)
                .channel("Referral", 15.0, 0.30)
                .build(),
            Self::Custom => Assumptions {
                aov: 25.0,
                orders_per_month: 1.0,
                gross_margin_pct: 0.40,
                variable_cost_per_order: 2.0,
                monthly_churn_rate: 0.10,
                channels: vec![Channel::new("Paid", 30.0, 1.0)],
                ..Assumptions::default()
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
