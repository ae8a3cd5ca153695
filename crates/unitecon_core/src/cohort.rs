//! Cohort simulation: follow a synthetic cohort of customers month by month.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::calculator::{monthly_discount_rate, pow_months};
use crate::error::ExportError;
use crate::model::Assumptions;

/// Size of the synthetic starting cohort
pub const INITIAL_CUSTOMERS: f64 = 1_000.0;

/// Default simulation horizon in months
pub const DEFAULT_COHORT_MONTHS: u32 = 36;

/// CSV header, in [`CohortRow`] field order
pub const CSV_COLUMNS: [&str; 8] = [
    "month",
    "survivors",
    "survivor_pct",
    "monthly_revenue",
    "monthly_contribution",
    "cumulative_contribution",
    "discounted_cumulative_contribution",
    "cac_threshold",
];

/// One month of cohort history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    /// 1-based month index
    pub month: u32,
    pub survivors: f64,
    pub survivor_pct: f64,
    pub monthly_revenue: f64,
    pub monthly_contribution: f64,
    pub cumulative_contribution: f64,
    pub discounted_cumulative_contribution: f64,
    /// Total CAC spent acquiring the cohort (constant across months)
    pub cac_threshold: f64,
}

/// Month-indexed cohort projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortTable {
    pub rows: Vec<CohortRow>,
}

impl CohortTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a 1-based month index
    #[must_use]
    pub fn month(&self, month: u32) -> Option<&CohortRow> {
        month
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx as usize))
    }

    #[must_use]
    pub fn last(&self) -> Option<&CohortRow> {
        self.rows.last()
    }

    /// Write the table as CSV with a header row.
    ///
    /// The header is written even for an empty table. Floats are written at
    /// full round-trip precision.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(CSV_COLUMNS)?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string
    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Project a cohort of [`INITIAL_CUSTOMERS`] over `n_months`.
///
/// Survivors decay geometrically from month 1 (`1000 × (1 − churn)^t`).
/// Revenue per order starts at AOV and compounds by the ARPU growth rate
/// each month after the first. Discounting uses the monthly equivalent of
/// the annual discount rate.
#[must_use]
pub fn build_cohort_table(inputs: &Assumptions, n_months: u32) -> CohortTable {
    let retention = 1.0 - inputs.monthly_churn_rate;
    let rate = monthly_discount_rate(inputs.annual_discount_rate);
    let cac_threshold = INITIAL_CUSTOMERS * inputs.blended_cac();

    let mut cumulative = 0.0;
    let mut discounted_cumulative = 0.0;
    let mut rows = Vec::new();

    for month in 1..=n_months {
        let t = u64::from(month);
        let survivors = INITIAL_CUSTOMERS * pow_months(retention, t);
        let arpu = inputs.aov * pow_months(1.0 + inputs.arpu_growth_rate, t - 1);
        let contribution_per_order = arpu * inputs.gross_margin_pct - inputs.variable_cost_per_order;

        let monthly_revenue = survivors * inputs.orders_per_month * arpu;
        let monthly_contribution = survivors * contribution_per_order * inputs.orders_per_month;

        cumulative += monthly_contribution;
        discounted_cumulative += monthly_contribution / pow_months(1.0 + rate, t);

        rows.push(CohortRow {
            month,
            survivors,
            survivor_pct: survivors / INITIAL_CUSTOMERS,
            monthly_revenue,
            monthly_contribution,
            cumulative_contribution: cumulative,
            discounted_cumulative_contribution: discounted_cumulative,
            cac_threshold,
        });
    }

    CohortTable { rows }
}

/// First month whose cumulative contribution covers the cohort's CAC.
///
/// `None` when the cohort never pays back within the table's horizon.
#[must_use]
pub fn find_payback_month(table: &CohortTable) -> Option<u32> {
    table
        .rows
        .iter()
        .find(|row| row.cumulative_contribution >= row.cac_threshold)
        .map(|row| row.month)
}
