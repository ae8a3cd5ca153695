use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use unitecon::config::{load_assumptions, resolve_assumptions};
use unitecon::io::emit;
use unitecon::{init_logging, report};
use unitecon_core::cohort::{DEFAULT_COHORT_MONTHS, build_cohort_table, find_payback_month};
use unitecon_core::comparison::Segment;
use unitecon_core::export::{cohort_to_csv, summary_to_json};
use unitecon_core::scenarios::{default_scenarios, find_scenario};
use unitecon_core::sensitivity::{sweep, tornado_ranking};
use unitecon_core::{Assumptions, Lever, Preset, compute};

/// Longest cohort projection accepted on the command line (100 years)
const MAX_COHORT_MONTHS: i64 = 1_200;

#[derive(Parser, Debug)]
#[command(name = "unitecon")]
#[command(about = "Unit economics calculator: LTV, CAC, payback and health scoring")]
struct Args {
    /// Path to a JSON or YAML assumptions file
    #[arg(short, long, global = true, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in template (delivery-marketplace, saas-marketplace, ...)
    #[arg(short, long, global = true, value_parser = parse_preset)]
    preset: Option<Preset>,

    /// Write the result to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline metrics and health flags (default)
    Summary,
    /// Month-by-month cohort projection as CSV
    Cohort {
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_COHORT_MONTHS,
            value_parser = clap::value_parser!(u32).range(..=MAX_COHORT_MONTHS)
        )]
        months: u32,
    },
    /// Rank levers by their impact on LTV:CAC
    Tornado {
        /// Improvement applied to every lever (0.10 = 10%)
        #[arg(short, long, default_value_t = 0.10)]
        improvement: f64,
    },
    /// Sweep one lever across a symmetric range
    Sweep {
        #[arg(long, value_parser = parse_lever)]
        lever: Lever,
        /// Half-width of the range (0.40 = -40% to +40%)
        #[arg(short, long, default_value_t = 0.40)]
        range: f64,
        #[arg(long, default_value_t = 41)]
        points: usize,
    },
    /// Run the built-in what-if scenarios
    Scenarios {
        /// Run a single scenario by name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Compare against a second assumptions file
    Compare {
        #[arg(long)]
        other: PathBuf,
    },
    /// Full summary as JSON
    Export,
    /// List built-in templates
    Presets,
}

fn parse_preset(name: &str) -> Result<Preset, String> {
    Preset::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Preset::ALL.iter().map(|p| p.key()).collect();
        format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
    })
}

fn parse_lever(name: &str) -> Result<Lever, String> {
    Lever::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Lever::ALL.iter().map(|l| l.label()).collect();
        format!("unknown lever '{name}' (expected one of: {})", known.join(", "))
    })
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let content = match args.command.unwrap_or(Command::Summary) {
        Command::Presets => report::render_presets(),
        command => {
            let (inputs, name) = resolve_assumptions(args.config.as_deref(), args.preset)?;
            run(command, inputs, name)?
        }
    };

    emit(args.output.as_deref(), &content)?;
    Ok(())
}

/// Run one analysis and render its report
fn run(command: Command, inputs: Assumptions, name: String) -> color_eyre::Result<String> {
    let outputs = compute(&inputs);
    tracing::debug!(business = %name, health_score = outputs.health_score, "computed outputs");

    let content = match command {
        Command::Summary => {
            let mut text = report::render_summary(&inputs, &outputs);
            text.push('\n');
            text.push_str(&report::render_waterfall(&inputs));
            text.push('\n');
            text.push_str(&report::render_playbook(&inputs, &outputs, &name));
            text
        }
        Command::Cohort { months } => {
            let table = build_cohort_table(&inputs, months);
            match find_payback_month(&table) {
                Some(month) => tracing::info!(month, "cohort pays back"),
                None => tracing::info!(months, "cohort does not pay back within horizon"),
            }
            cohort_to_csv(&table)?
        }
        Command::Tornado { improvement } => {
            report::render_tornado(&tornado_ranking(&inputs, improvement), improvement)
        }
        Command::Sweep {
            lever,
            range,
            points,
        } => report::render_sweep(lever.label(), &sweep(&inputs, lever, range, points)),
        Command::Scenarios { name: None } => {
            report::render_scenarios(&inputs, &outputs, default_scenarios())
        }
        Command::Scenarios {
            name: Some(scenario_name),
        } => {
            let scenario = find_scenario(&scenario_name)
                .ok_or_else(|| eyre!("unknown scenario: {scenario_name}"))?;
            report::render_scenarios(&inputs, &outputs, std::slice::from_ref(scenario))
        }
        Command::Compare { other } => {
            let other_name = other
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "other".to_string());
            let a = Segment::new(name, inputs);
            let b = Segment::new(other_name, load_assumptions(&other)?);
            report::render_comparison(&a, &b)
        }
        Command::Export => summary_to_json(&inputs, &outputs)?,
        Command::Presets => report::render_presets(),
    };

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_arguments() {
        let args = Args::try_parse_from([
            "unitecon",
            "--preset",
            "saas-marketplace",
            "sweep",
            "--lever",
            "Churn Rate",
            "--points",
            "5",
        ])
        .unwrap();

        assert_eq!(args.preset, Some(Preset::SaasMarketplace));
        match args.command {
            Some(Command::Sweep { lever, range, points }) => {
                assert_eq!(lever, Lever::ChurnRate);
                assert_eq!(range, 0.40);
                assert_eq!(points, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cohort_months_are_capped() {
        let args = Args::try_parse_from(["unitecon", "cohort", "--months", "1200"]).unwrap();
        assert!(matches!(args.command, Some(Command::Cohort { months: 1200 })));

        let result = Args::try_parse_from(["unitecon", "cohort", "--months", "4000000000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_conflicts_with_preset() {
        let result = Args::try_parse_from([
            "unitecon",
            "--config",
            "a.json",
            "--preset",
            "custom",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_export_and_compare() {
        let inputs = Preset::DeliveryMarketplace.assumptions();
        let json = run(Command::Export, inputs.clone(), "delivery".to_string()).unwrap();
        assert!(json.contains("\"channel_ratios\""));

        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("saas.json");
        let saas = unitecon_core::export::inputs_to_json(&Preset::SaasMarketplace.assumptions());
        std::fs::write(&other, saas.unwrap()).unwrap();

        let report = run(Command::Compare { other }, inputs, "delivery".to_string()).unwrap();
        assert!(report.contains("saas"));
        assert!(report.contains("Health Score"));
    }

    #[test]
    fn test_unknown_scenario_is_an_error() {
        let inputs = Preset::Custom.assumptions();
        let command = Command::Scenarios {
            name: Some("Price war".to_string()),
        };
        assert!(run(command, inputs, "custom".to_string()).is_err());
    }

    #[test]
    fn test_unknown_lever_is_rejected() {
        let err = parse_lever("price").unwrap_err();
        assert!(err.contains("Gross Margin"));
    }
}
