//! Sensitivity command implementation
//!
//! Full sensitivity report, or a single named stress scenario.

use std::fmt;

use clap::Args;
use merton_risk::analysis::AnalysisSettings;
use merton_risk::sensitivity::{StressOutcome, StressScenario};
use serde::Serialize;
use tracing::{info, warn};

use super::FirmArgs;
use crate::output::{emit, fmt_opt, OutputFormat};
use crate::{CliError, Result};

/// Arguments for the sensitivity command
#[derive(Args, Debug, Clone)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub firm: FirmArgs,

    /// Market spread in bps used for the robustness check
    #[arg(long)]
    pub market_spread: f64,

    /// Run only this stress scenario (e.g. "severe", "Mild Stress")
    #[arg(long)]
    pub scenario: Option<String>,
}

/// One stress scenario, as printed by `--scenario`.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioView {
    /// Scenario outcome
    pub outcome: StressOutcome,
    /// Unshocked spread for comparison
    pub base_spread_bps: Option<f64>,
}

impl fmt::Display for ScenarioView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.outcome;
        writeln!(f, "{}: {}", o.scenario, o.scenario.description())?;
        writeln!(
            f,
            "  Shocks               sigma_E {:+.0}%, D {:+.0}%",
            o.volatility_shock_pct(),
            o.debt_shock_pct()
        )?;
        writeln!(f, "  Solver method        {}", o.method)?;
        writeln!(f, "  Distance to default  {}", fmt_opt(o.metrics.distance_to_default, 4))?;
        writeln!(f, "  Base spread (bps)    {}", fmt_opt(self.base_spread_bps, 2))?;
        write!(f, "  Stressed spread      {}", fmt_opt(o.metrics.credit_spread_bps, 2))
    }
}

/// Parse a scenario by display name ("Severe Stress") or short key ("severe").
pub fn parse_scenario(name: &str) -> Result<StressScenario> {
    let key = name.trim();
    let short = || {
        StressScenario::ALL
            .iter()
            .copied()
            .find(|s| format!("{:?}", s).eq_ignore_ascii_case(key))
    };
    StressScenario::from_name(key).or_else(short).ok_or_else(|| {
        let known: Vec<&str> = StressScenario::ALL.iter().map(|s| s.name()).collect();
        CliError::InvalidArgument(format!(
            "Unknown scenario: {}. Supported: {}",
            name,
            known.join(", ")
        ))
    })
}

/// Run the sensitivity command
pub fn run(
    args: &SensitivityArgs,
    settings: &AnalysisSettings,
    format: OutputFormat,
) -> Result<()> {
    let inputs = args.firm.to_inputs(settings)?;
    let engine = settings.sensitivity_engine(inputs);

    if let Some(name) = &args.scenario {
        let scenario = parse_scenario(name)?;
        info!("Running stress scenario {}", scenario);
        let view = ScenarioView {
            outcome: engine.run_scenario(scenario),
            base_spread_bps: engine.base_evaluation().metrics.credit_spread_bps,
        };
        return emit(format, &view);
    }

    info!("Generating sensitivity report");
    let report = engine.generate_report(args.market_spread);
    let failed = report.failed_points();
    if failed > 0 {
        warn!("{} sensitivity points failed", failed);
    }
    emit(format, &report)
}
