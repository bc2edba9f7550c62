//! Check command implementation
//!
//! Prints the effective configuration after file and environment overrides.

use std::fmt::Write as _;

use infra_config::AnalysisConfig;
use merton_risk::analysis::AnalysisSettings;
use tracing::info;

/// Human-readable summary of the effective configuration.
pub fn summary(config: &AnalysisConfig, settings: &AnalysisSettings) -> String {
    let mut out = String::new();
    let shocks = |grid: &[f64]| {
        grid.iter()
            .map(|s| format!("{:+.0}%", s * 100.0))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let _ = writeln!(out, "Merton signal engine v{}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "  Log level            {}", config.log_level);
    let _ = writeln!(
        out,
        "  Thresholds (bps)     strong {}, moderate {}",
        settings.thresholds.strong_bps(),
        settings.thresholds.moderate_bps()
    );
    let _ = writeln!(out, "  Risk-free rate       {}", settings.risk_free_rate);
    let _ = writeln!(out, "  Horizon (years)      {}", settings.horizon_years);
    let _ = writeln!(out, "  Recovery rate        {}", settings.params.recovery_rate());
    let _ = writeln!(
        out,
        "  Volatility shocks    {}",
        shocks(settings.volatility_grid.shocks())
    );
    let _ = writeln!(
        out,
        "  Debt shocks          {}",
        shocks(settings.debt_grid.shocks())
    );
    let _ = writeln!(
        out,
        "  Robustness shocks    {}",
        shocks(settings.robustness_grid.shocks())
    );
    let _ = write!(
        out,
        "  Max failure rate     {:.0}%",
        settings.max_failure_rate * 100.0
    );
    out
}

/// Run the check command
pub fn run(config: &AnalysisConfig, settings: &AnalysisSettings) {
    info!("Configuration is valid");
    println!("{}", summary(config, settings));
}
