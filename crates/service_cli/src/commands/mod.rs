//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

use clap::Args;
use merton_core::types::{InputError, MarketInputs};
use merton_risk::analysis::AnalysisSettings;

pub mod batch;
pub mod check;
pub mod evaluate;
pub mod sensitivity;

/// Balance-sheet inputs for a single firm.
#[derive(Args, Debug, Clone)]
pub struct FirmArgs {
    /// Market capitalisation E
    #[arg(long)]
    pub equity: f64,

    /// Annualised equity volatility (0.40 = 40%)
    #[arg(long)]
    pub equity_vol: f64,

    /// Face value of debt D
    #[arg(long)]
    pub debt: f64,

    /// Risk-free rate (defaults to the configured rate)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<f64>,

    /// Debt horizon in years (defaults to the configured horizon)
    #[arg(long)]
    pub horizon: Option<f64>,
}

impl FirmArgs {
    /// Validated model inputs, filling rate and horizon from `settings`.
    pub fn to_inputs(&self, settings: &AnalysisSettings) -> Result<MarketInputs, InputError> {
        MarketInputs::new(
            self.equity,
            self.equity_vol,
            self.debt,
            self.rate.unwrap_or(settings.risk_free_rate),
            self.horizon.unwrap_or(settings.horizon_years),
        )
    }
}

#[cfg(test)]
pub(crate) fn firm(equity: f64, equity_vol: f64, debt: f64) -> FirmArgs {
    FirmArgs {
        equity,
        equity_vol,
        debt,
        rate: Some(0.05),
        horizon: Some(1.0),
    }
}
