//! Loading assumptions from JSON or YAML files and built-in presets.

use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use unitecon_core::{Assumptions, InputError, Preset};

/// On-disk format of an assumptions file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick a format from the file extension; anything other than
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse assumptions text in the given format.
///
/// Both formats go through the same key-value constructor, so legacy `cac`
/// fields and missing-field checks behave identically.
pub fn parse_assumptions(text: &str, format: ConfigFormat) -> color_eyre::Result<Assumptions> {
    let value: serde_json::Value = match format {
        ConfigFormat::Json => serde_json::from_str(text).wrap_err("invalid JSON")?,
        ConfigFormat::Yaml => serde_saphyr::from_str(text).wrap_err("invalid YAML")?,
    };

    match value {
        serde_json::Value::Object(map) => Ok(Assumptions::from_map(&map)?),
        other => Err(InputError::InvalidValue {
            field: "assumptions",
            message: format!("expected a mapping at the top level, got {other}"),
        }
        .into()),
    }
}

/// Read and parse an assumptions file
pub fn load_assumptions(path: &Path) -> color_eyre::Result<Assumptions> {
    if !path.exists() {
        return Err(eyre!("config file not found: {}", path.display()));
    }

    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let inputs = parse_assumptions(&text, ConfigFormat::from_path(path))
        .wrap_err_with(|| format!("failed to load assumptions from {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        channels = inputs.channels.len(),
        "loaded assumptions"
    );
    Ok(inputs)
}

/// Resolve the assumptions for a run: an explicit file wins over a preset,
/// and with neither the delivery marketplace preset is used.
pub fn resolve_assumptions(
    config: Option<&Path>,
    preset: Option<Preset>,
) -> color_eyre::Result<(Assumptions, String)> {
    match (config, preset) {
        (Some(path), _) => {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| Preset::Custom.name().to_string());
            Ok((load_assumptions(path)?, name))
        }
        (None, Some(preset)) => Ok((preset.assumptions(), preset.name().to_string())),
        (None, None) => {
            tracing::debug!("no config or preset given, using the delivery marketplace preset");
            let preset = Preset::DeliveryMarketplace;
            Ok((preset.assumptions(), preset.name().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DARK_STORE_JSON: &str = r#"{
        "aov": 34.0,
        "orders_per_month": 2.8,
        "gross_margin_pct": 0.30,
        "variable_cost_per_order": 4.20,
        "monthly_churn_rate": 0.08,
        "channels": [
            {"name": "Paid", "cac": 25.0, "pct_of_new_customers": 0.60},
            {"name": "Organic", "cac": 8.0, "pct_of_new_customers": 0.30},
            {"name": "Referral", "cac": 4.0, "pct_of_new_customers": 0.10}
        ]
    }"#;

    const DARK_STORE_YAML: &str = "\
aov: 34.0
orders_per_month: 2.8
gross_margin_pct: 0.30
variable_cost_per_order: 4.20
monthly_churn_rate: 0.08
channels:
  - name: Paid
    cac: 25.0
    pct_of_new_customers: 0.60
  - name: Organic
    cac: 8.0
    pct_of_new_customers: 0.30
  - name: Referral
    cac: 4.0
    pct_of_new_customers: 0.10
";

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json = parse_assumptions(DARK_STORE_JSON, ConfigFormat::Json).unwrap();
        let yaml = parse_assumptions(DARK_STORE_YAML, ConfigFormat::Yaml).unwrap();

        assert_eq!(json, yaml);
        assert!((json.blended_cac() - 17.80).abs() < 1e-9);
    }

    #[test]
    fn test_legacy_yaml_cac() {
        let yaml = "aov: 50\norders_per_month: 1\ngross_margin_pct: 0.8\n\
                    variable_cost_per_order: 0\nmonthly_churn_rate: 0.1\ncac: 100\n";
        let inputs = parse_assumptions(yaml, ConfigFormat::Yaml).unwrap();

        assert_eq!(inputs.channels.len(), 1);
        assert_eq!(inputs.blended_cac(), 100.0);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = parse_assumptions(r#"{"aov": 34.0}"#, ConfigFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("missing required field"));
    }

    #[test]
    fn test_top_level_must_be_a_mapping() {
        assert!(parse_assumptions("[1, 2, 3]", ConfigFormat::Json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dark_store.yaml");
        fs::write(&path, DARK_STORE_YAML).unwrap();

        let (inputs, name) = resolve_assumptions(Some(&path), None).unwrap();
        assert_eq!(name, "dark_store");
        assert_eq!(inputs.channels.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_assumptions(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_preset_fallback() {
        let (_, name) = resolve_assumptions(None, Some(Preset::SaasMarketplace)).unwrap();
        assert_eq!(name, "SaaS Marketplace");

        let (inputs, name) = resolve_assumptions(None, None).unwrap();
        assert_eq!(name, "Delivery Marketplace");
        assert_eq!(inputs, Preset::DeliveryMarketplace.assumptions());
    }
}
