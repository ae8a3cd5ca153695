//! Business assumptions: the only input to every calculator in this crate.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Default annual discount rate (cost of capital) when none is supplied
pub const DEFAULT_ANNUAL_DISCOUNT_RATE: f64 = 0.10;

/// Name given to the single channel synthesized from a legacy flat `cac` field
pub const LEGACY_CHANNEL_NAME: &str = "Blended";

/// Tolerance used when checking that channel shares sum to one
const SHARE_TOLERANCE: f64 = 1e-6;

/// A customer acquisition channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    /// Cost to acquire one customer through this channel
    pub cac: f64,
    /// Fraction of new customers arriving through this channel (0..=1)
    #[serde(rename = "pct_of_new_customers", alias = "share")]
    pub share: f64,
}

impl Channel {
    pub fn new(name: impl Into<String>, cac: f64, share: f64) -> Self {
        Self {
            name: name.into(),
            cac,
            share,
        }
    }
}

/// The assumption record for one business (or segment).
///
/// Values are taken as given. Out-of-domain numbers such as a zero AOV or a
/// churn of 1.0 are not rejected; they flow through the calculators as
/// infinities or NaN. Derived records (scenarios, sweeps) are always new
/// values built with struct update syntax, so the caller's record is never
/// touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAssumptions")]
pub struct Assumptions {
    /// Average order value ($)
    pub aov: f64,
    /// Orders per customer per month
    pub orders_per_month: f64,
    /// Gross margin as a fraction (0.30 = 30%)
    pub gross_margin_pct: f64,
    /// Variable (fulfilment) cost per order ($)
    pub variable_cost_per_order: f64,
    /// Fraction of customers lost each month
    pub monthly_churn_rate: f64,
    /// Monthly fixed overhead ($)
    pub monthly_fixed_costs: f64,
    /// Cost of capital used for discounting
    pub annual_discount_rate: f64,
    /// Monthly growth in revenue per retained customer (expansion revenue)
    pub arpu_growth_rate: f64,
    pub channels: Vec<Channel>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            aov: 0.0,
            orders_per_month: 0.0,
            gross_margin_pct: 0.0,
            variable_cost_per_order: 0.0,
            monthly_churn_rate: 0.0,
            monthly_fixed_costs: 0.0,
            annual_discount_rate: DEFAULT_ANNUAL_DISCOUNT_RATE,
            arpu_growth_rate: 0.0,
            channels: Vec::new(),
        }
    }
}

impl Assumptions {
    /// Start a fluent builder
    #[must_use]
    pub fn builder() -> AssumptionsBuilder {
        AssumptionsBuilder::new()
    }

    /// Weighted-average CAC across channels, weighted by share of new customers.
    ///
    /// Uses the literal weighted sum even when shares do not add up to one.
    #[must_use]
    pub fn blended_cac(&self) -> f64 {
        self.channels.iter().map(|ch| ch.cac * ch.share).sum()
    }

    /// Sum of all channel shares
    #[must_use]
    pub fn channel_share_total(&self) -> f64 {
        self.channels.iter().map(|ch| ch.share).sum()
    }

    /// Whether channel shares sum to 1.0 (within a small tolerance).
    ///
    /// An empty channel list counts as balanced.
    #[must_use]
    pub fn channel_shares_balanced(&self) -> bool {
        self.channels.is_empty() || (self.channel_share_total() - 1.0).abs() <= SHARE_TOLERANCE
    }

    /// Look up a channel by name
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|ch| ch.name == name)
    }

    /// Build assumptions from a flat key-value mapping (e.g. a parsed JSON
    /// object).
    ///
    /// Accepts either a `channels` list or the legacy scalar `cac`, which is
    /// normalized into a single [`LEGACY_CHANNEL_NAME`] channel with a share
    /// of 1.0. `monthly_fixed_costs`, `annual_discount_rate` and
    /// `arpu_growth_rate` are optional.
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        const REQUIRED: [&str; 5] = [
            "aov",
            "orders_per_month",
            "gross_margin_pct",
            "variable_cost_per_order",
            "monthly_churn_rate",
        ];

        for field in REQUIRED {
            match map.get(field) {
                None => return Err(InputError::MissingField(field)),
                Some(value) if !value.is_number() => {
                    return Err(InputError::InvalidValue {
                        field,
                        message: format!("expected a number, got {value}"),
                    });
                }
                Some(_) => {}
            }
        }

        let inputs: Assumptions = serde_json::from_value(serde_json::Value::Object(map.clone()))?;

        if !inputs.channel_shares_balanced() {
            tracing::warn!(
                total = inputs.channel_share_total(),
                "channel shares do not sum to 1.0; blended CAC uses the literal weighted sum"
            );
        }

        Ok(inputs)
    }

    /// Parse assumptions from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Object(map) => Self::from_map(&map),
            other => Err(InputError::InvalidValue {
                field: "assumptions",
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

/// Wire shape of [`Assumptions`], accepting both channel formats.
#[derive(Deserialize)]
struct RawAssumptions {
    aov: f64,
    orders_per_month: f64,
    gross_margin_pct: f64,
    variable_cost_per_order: f64,
    monthly_churn_rate: f64,
    #[serde(default)]
    monthly_fixed_costs: f64,
    #[serde(default = "default_discount_rate")]
    annual_discount_rate: f64,
    #[serde(default, alias = "monthly_arpu_growth")]
    arpu_growth_rate: f64,
    #[serde(default)]
    channels: Option<Vec<Channel>>,
    #[serde(default)]
    cac: Option<f64>,
}

fn default_discount_rate() -> f64 {
    DEFAULT_ANNUAL_DISCOUNT_RATE
}

impl From<RawAssumptions> for Assumptions {
    fn from(raw: RawAssumptions) -> Self {
        let channels = match (raw.channels, raw.cac) {
            (Some(channels), _) => channels,
            (None, Some(cac)) => vec![Channel::new(LEGACY_CHANNEL_NAME, cac, 1.0)],
            (None, None) => Vec::new(),
        };

        Self {
            aov: raw.aov,
            orders_per_month: raw.orders_per_month,
            gross_margin_pct: raw.gross_margin_pct,
            variable_cost_per_order: raw.variable_cost_per_order,
            monthly_churn_rate: raw.monthly_churn_rate,
            monthly_fixed_costs: raw.monthly_fixed_costs,
            annual_discount_rate: raw.annual_discount_rate,
            arpu_growth_rate: raw.arpu_growth_rate,
            channels,
        }
    }
}

/// Fluent builder for [`Assumptions`]
///
/// ```
/// use unitecon_core::model::Assumptions;
///
/// let inputs = Assumptions::builder()
///     .aov(34.0)
///     .orders_per_month(2.8)
///     .gross_margin(0.30)
///     .variable_cost(4.20)
///     .churn(0.08)
///     .channel("Paid", 25.0, 0.60)
///     .channel("Organic", 8.0, 0.30)
///     .channel("Referral", 4.0, 0.10)
///     .build();
///
/// assert!((inputs.blended_cac() - 17.80).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssumptionsBuilder {
    inputs: Assumptions,
}

impl AssumptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn aov(mut self, aov: f64) -> Self {
        self.inputs.aov = aov;
        self
    }

    #[must_use]
    pub fn orders_per_month(mut self, orders: f64) -> Self {
        self.inputs.orders_per_month = orders;
        self
    }

    #[must_use]
    pub fn gross_margin(mut self, pct: f64) -> Self {
        self.inputs.gross_margin_pct = pct;
        self
    }

    #[must_use]
    pub fn variable_cost(mut self, cost: f64) -> Self {
        self.inputs.variable_cost_per_order = cost;
        self
    }

    #[must_use]
    pub fn churn(mut self, rate: f64) -> Self {
        self.inputs.monthly_churn_rate = rate;
        self
    }

    #[must_use]
    pub fn fixed_costs(mut self, monthly: f64) -> Self {
        self.inputs.monthly_fixed_costs = monthly;
        self
    }

    #[must_use]
    pub fn discount_rate(mut self, annual: f64) -> Self {
        self.inputs.annual_discount_rate = annual;
        self
    }

    #[must_use]
    pub fn arpu_growth(mut self, monthly: f64) -> Self {
        self.inputs.arpu_growth_rate = monthly;
        self
    }

    /// Append an acquisition channel
    #[must_use]
    pub fn channel(mut self, name: impl Into<String>, cac: f64, share: f64) -> Self {
        self.inputs.channels.push(Channel::new(name, cac, share));
        self
    }

    /// Replace all channels with a single blended channel at this CAC
    #[must_use]
    pub fn cac(mut self, cac: f64) -> Self {
        self.inputs.channels = vec![Channel::new(LEGACY_CHANNEL_NAME, cac, 1.0)];
        self
    }

    #[must_use]
    pub fn build(self) -> Assumptions {
        self.inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_blended_cac_is_share_weighted() {
        let inputs = Assumptions::builder()
            .channel("Paid", 25.0, 0.60)
            .channel("Organic", 8.0, 0.30)
            .channel("Referral", 4.0, 0.10)
            .build();

        // 15.0 + 2.4 + 0.4
        assert!((inputs.blended_cac() - 17.80).abs() < 1e-9);
        assert!(inputs.channel_shares_balanced());
    }

    #[test]
    fn test_blended_cac_without_channels_is_zero() {
        let inputs = Assumptions::default();
        assert_eq!(inputs.blended_cac(), 0.0);
        assert!(inputs.channel_shares_balanced());
    }

    #[test]
    fn test_unbalanced_shares_still_compute() {
        let inputs = Assumptions::builder()
            .channel("Paid", 20.0, 0.50)
            .channel("Organic", 10.0, 0.30)
            .build();

        assert!(!inputs.channel_shares_balanced());
        assert!((inputs.channel_share_total() - 0.80).abs() < 1e-12);
        assert!((inputs.blended_cac() - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_map_with_channels() {
        let map = as_map(json!({
            "aov": 34,
            "orders_per_month": 2.8,
            "gross_margin_pct": 0.30,
            "variable_cost_per_order": 4.20,
            "monthly_churn_rate": 0.08,
            "monthly_fixed_costs": 12000,
            "channels": [
                {"name": "Paid", "cac": 25.0, "pct_of_new_customers": 0.60},
                {"name": "Organic", "cac": 8.0, "pct_of_new_customers": 0.40}
            ]
        }));

        let inputs = Assumptions::from_map(&map).unwrap();
        assert_eq!(inputs.aov, 34.0);
        assert_eq!(inputs.monthly_fixed_costs, 12_000.0);
        assert_eq!(inputs.annual_discount_rate, DEFAULT_ANNUAL_DISCOUNT_RATE);
        assert_eq!(inputs.arpu_growth_rate, 0.0);
        assert_eq!(inputs.channels.len(), 2);
        assert_eq!(inputs.channel("Organic").map(|ch| ch.cac), Some(8.0));
    }

    #[test]
    fn test_from_map_normalizes_legacy_cac() {
        let map = as_map(json!({
            "aov": 50.0,
            "orders_per_month": 1.0,
            "gross_margin_pct": 0.8,
            "variable_cost_per_order": 0.0,
            "monthly_churn_rate": 0.1,
            "cac": 100.0
        }));

        let inputs = Assumptions::from_map(&map).unwrap();
        assert_eq!(
            inputs.channels,
            vec![Channel::new(LEGACY_CHANNEL_NAME, 100.0, 1.0)]
        );
        assert_eq!(inputs.blended_cac(), 100.0);
    }

    #[test]
    fn test_channels_take_precedence_over_legacy_cac() {
        let map = as_map(json!({
            "aov": 50.0,
            "orders_per_month": 1.0,
            "gross_margin_pct": 0.8,
            "variable_cost_per_order": 0.0,
            "monthly_churn_rate": 0.1,
            "cac": 100.0,
            "channels": [{"name": "Organic", "cac": 5.0, "pct_of_new_customers": 1.0}]
        }));

        let inputs = Assumptions::from_map(&map).unwrap();
        assert_eq!(inputs.blended_cac(), 5.0);
    }

    #[test]
    fn test_from_map_reports_missing_field() {
        let map = as_map(json!({
            "aov": 50.0,
            "orders_per_month": 1.0,
            "gross_margin_pct": 0.8,
            "variable_cost_per_order": 0.0
        }));

        let err = Assumptions::from_map(&map).unwrap_err();
        assert!(matches!(err, InputError::MissingField("monthly_churn_rate")));
    }

    #[test]
    fn test_from_map_rejects_non_numeric_field() {
        let map = as_map(json!({
            "aov": "a lot",
            "orders_per_month": 1.0,
            "gross_margin_pct": 0.8,
            "variable_cost_per_order": 0.0,
            "monthly_churn_rate": 0.1
        }));

        let err = Assumptions::from_map(&map).unwrap_err();
        assert!(matches!(err, InputError::InvalidValue { field: "aov", .. }));
    }

    #[test]
    fn test_arpu_growth_alias() {
        let inputs = Assumptions::from_json(
            r#"{"aov": 50, "orders_per_month": 1, "gross_margin_pct": 0.8,
                "variable_cost_per_order": 0, "monthly_churn_rate": 0.1,
                "monthly_arpu_growth": 0.03}"#,
        )
        .unwrap();
        assert_eq!(inputs.arpu_growth_rate, 0.03);
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let inputs = Assumptions::builder()
            .aov(34.0)
            .orders_per_month(2.8)
            .gross_margin(0.30)
            .variable_cost(4.20)
            .churn(0.08)
            .fixed_costs(12_000.0)
            .arpu_growth(0.01)
            .channel("Paid", 25.0, 0.60)
            .channel("Organic", 8.0, 0.40)
            .build();

        let json = serde_json::to_string(&inputs).unwrap();
        let back = Assumptions::from_json(&json).unwrap();
        assert_eq!(back, inputs);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(Assumptions::from_json("[1, 2, 3]").is_err());
        assert!(Assumptions::from_json("not json").is_err());
    }
}
