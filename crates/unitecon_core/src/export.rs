//! JSON and CSV export of inputs, results and cohort projections.
//!
//! Non-finite floats are written as the strings `"Infinity"`, `"-Infinity"`
//! and `"NaN"` so that every document round-trips through [`serde_json`].

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::calculator::{ChannelRatio, channel_ltv_cac_ratios};
use crate::cohort::CohortTable;
use crate::error::ExportError;
use crate::model::{Assumptions, Outputs};

/// Everything needed to reproduce and review one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub inputs: Assumptions,
    pub outputs: Outputs,
    #[serde(default)]
    pub channel_ratios: Vec<ChannelRatio>,
}

impl Summary {
    #[must_use]
    pub fn new(inputs: &Assumptions, outputs: &Outputs) -> Self {
        Self {
            inputs: inputs.clone(),
            outputs: outputs.clone(),
            channel_ratios: channel_ltv_cac_ratios(inputs),
        }
    }
}

/// Pretty-printed JSON of the assumptions, readable back with
/// [`Assumptions::from_json`]
pub fn inputs_to_json(inputs: &Assumptions) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(inputs)?)
}

/// Pretty-printed JSON of inputs, outputs and per-channel LTV:CAC
pub fn summary_to_json(inputs: &Assumptions, outputs: &Outputs) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&Summary::new(inputs, outputs))?)
}

/// Stream a summary document into a writer
pub fn write_summary<W: Write>(
    writer: W,
    inputs: &Assumptions,
    outputs: &Outputs,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &Summary::new(inputs, outputs))?;
    Ok(())
}

pub fn summary_from_json(json: &str) -> Result<Summary, ExportError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse an output bundle, accepting infinity sentinels
pub fn outputs_from_json(json: &str) -> Result<Outputs, ExportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn cohort_to_csv(table: &CohortTable) -> Result<String, ExportError> {
    table.to_csv_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute;
    use crate::cohort::build_cohort_table;

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

    #[test]
    fn test_inputs_json_reads_back() {
        let inputs = dark_store();
        let json = inputs_to_json(&inputs).unwrap();

        assert!(json.contains("\"pct_of_new_customers\": 0.6"));
        assert_eq!(Assumptions::from_json(&json).unwrap(), inputs);
    }

    #[test]
    fn test_summary_carries_channel_ratios() {
        let inputs = dark_store();
        let outputs = compute(&inputs);
        let json = summary_to_json(&inputs, &outputs).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outputs"]["health_score"], 100);
        assert_eq!(value["channel_ratios"][0]["name"], "Paid");
        assert_eq!(value["channel_ratios"].as_array().unwrap().len(), 3);

        let summary = summary_from_json(&json).unwrap();
        assert_eq!(summary.inputs, inputs);
        assert_eq!(summary.outputs, outputs);
    }

    #[test]
    fn test_infinite_outputs_use_string_sentinels() {
        let inputs = Assumptions {
            monthly_churn_rate: 0.0,
            variable_cost_per_order: 20.0,
            ..dark_store()
        };
        let outputs = compute(&inputs);
        let json = summary_to_json(&inputs, &outputs).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outputs"]["ltv"], "Infinity");
        assert_eq!(value["outputs"]["payback_months"], "Infinity");

        let outputs_json = serde_json::to_string(&value["outputs"]).unwrap();
        let parsed = outputs_from_json(&outputs_json).unwrap();
        assert_eq!(parsed.ltv, f64::INFINITY);
        assert_eq!(parsed.health_flags, outputs.health_flags);
    }

    #[test]
    fn test_write_summary_matches_string_form() {
        let inputs = dark_store();
        let outputs = compute(&inputs);

        let mut buffer = Vec::new();
        write_summary(&mut buffer, &inputs, &outputs).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            summary_to_json(&inputs, &outputs).unwrap()
        );
    }

    #[test]
    fn test_cohort_csv_has_header_and_rows() {
        let table = build_cohort_table(&dark_store(), 12);
        let csv = cohort_to_csv(&table).unwrap();
        assert_eq!(csv.lines().count(), 13);
        assert!(csv.starts_with("month,survivors,"));
    }

    #[test]
    fn test_malformed_outputs_are_rejected() {
        let err = outputs_from_json("{\"ltv\": \"lots\"}").unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }
}
