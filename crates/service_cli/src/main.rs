//! Merton CLI - Command Line Operations for Structural Credit Signals
//!
//! Operational entry point for the Merton signal engine.
//!
//! # Commands
//!
//! - `merton evaluate` - Solve one firm and classify its spread signal
//! - `merton sensitivity` - Volatility/debt grids, stress scenarios, robustness
//! - `merton batch --input <file>` - Rank a universe of firms by signal strength
//! - `merton check` - Validate and print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate loads configuration
//! (defaults < TOML file < `MERTON_*` environment), initialises tracing and
//! dispatches to the model and risk crates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use infra_config::{build_config, init_tracing, LogLevel};
use merton_risk::analysis::AnalysisSettings;
use tracing::debug;

mod commands;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::batch::BatchArgs;
use commands::evaluate::EvaluateArgs;
use commands::sensitivity::SensitivityArgs;
use output::OutputFormat;

/// Merton structural credit signal CLI
#[derive(Parser)]
#[command(name = "merton")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one firm and classify its spread signal
    Evaluate(EvaluateArgs),

    /// Run sensitivity grids, stress scenarios and the robustness check
    Sensitivity(SensitivityArgs),

    /// Analyse a universe of firms from a JSON file
    Batch(BatchArgs),

    /// Check configuration
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = build_config(cli.config.as_deref())?;
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    init_tracing(level);
    debug!("Loaded configuration: {:?}", config);

    let settings = AnalysisSettings::from_config(&config)?;

    match cli.command {
        Commands::Evaluate(args) => commands::evaluate::run(&args, &settings, cli.output),
        Commands::Sensitivity(args) => commands::sensitivity::run(&args, &settings, cli.output),
        Commands::Batch(args) => commands::batch::run(&args, &settings, cli.output),
        Commands::Check => {
            commands::check::run(&config, &settings);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "merton",
            "evaluate",
            "--equity",
            "100",
            "--equity-vol",
            "0.4",
            "--debt",
            "80",
            "--rate",
            "-0.005",
            "--market-spread",
            "180",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.firm.equity, 100.0);
                assert_eq!(args.firm.rate, Some(-0.005));
                assert_eq!(args.market_spread, Some(180.0));
            }
            _ => panic!("expected evaluate"),
        }
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_sensitivity_json() {
        let cli = Cli::try_parse_from([
            "merton",
            "--output",
            "json",
            "sensitivity",
            "--equity",
            "100",
            "--equity-vol",
            "0.4",
            "--debt",
            "80",
            "--market-spread",
            "150",
            "--scenario",
            "severe",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Sensitivity(SensitivityArgs { scenario: Some(ref s), .. }) if s == "severe"
        ));
    }

    #[test]
    fn test_missing_required_argument() {
        assert!(Cli::try_parse_from(["merton", "evaluate", "--equity", "100"]).is_err());
    }
}
