//! Evaluate command implementation
//!
//! Solves one firm and, when a market spread is given, classifies the signal.

use std::fmt;

use clap::Args;
use merton_models::signals::{CreditRating, Signal};
use merton_models::structural::Evaluation;
use merton_risk::analysis::AnalysisSettings;
use serde::Serialize;
use tracing::info;

use super::FirmArgs;
use crate::output::{emit, fmt_opt, OutputFormat};
use crate::Result;

/// Arguments for a single-firm evaluation
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub firm: FirmArgs,

    /// Observed market spread in bps; enables signal classification
    #[arg(long)]
    pub market_spread: Option<f64>,
}

/// Evaluation plus the optional relative-value signal.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    /// Model output
    pub evaluation: Evaluation,
    /// Rating bucket from model leverage
    pub rating: CreditRating,
    /// Market spread the signal was measured against
    pub market_spread_bps: Option<f64>,
    /// Signal, when a market spread was supplied and the model spread is defined
    pub signal: Option<Signal>,
}

/// Evaluate `args` under `settings`.
pub fn evaluate(args: &EvaluateArgs, settings: &AnalysisSettings) -> Result<EvaluationSummary> {
    let inputs = args.firm.to_inputs(settings)?;
    let evaluation = settings.model().evaluate(&inputs);
    let rating = CreditRating::from_leverage(evaluation.leverage.unwrap_or(f64::NAN));

    let signal = match (args.market_spread, evaluation.metrics.credit_spread_bps) {
        (Some(market), Some(theoretical)) => Some(settings.thresholds.signal(theoretical, market)),
        _ => None,
    };

    Ok(EvaluationSummary {
        evaluation,
        rating,
        market_spread_bps: args.market_spread,
        signal,
    })
}

/// Run the evaluate command
pub fn run(args: &EvaluateArgs, settings: &AnalysisSettings, format: OutputFormat) -> Result<()> {
    info!(
        "Evaluating E={} sigma_E={} D={}",
        args.firm.equity, args.firm.equity_vol, args.firm.debt
    );
    let summary = evaluate(args, settings)?;
    emit(format, &summary)
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let eval = &self.evaluation;
        let metrics = &eval.metrics;
        writeln!(f, "MERTON EVALUATION")?;
        writeln!(f, "  Asset value V        {:.4e}", eval.solution.asset_value)?;
        writeln!(f, "  Asset volatility     {:.4}", eval.solution.asset_vol)?;
        writeln!(f, "  Solver method        {}", eval.solution.method)?;
        writeln!(f, "  Leverage D/V         {}", fmt_opt(eval.leverage, 4))?;
        writeln!(f, "  Distance to default  {}", fmt_opt(metrics.distance_to_default, 4))?;
        writeln!(
            f,
            "  Default probability  {}",
            fmt_opt(metrics.default_probability.map(|p| p * 100.0), 4)
        )?;
        writeln!(f, "  Credit spread (bps)  {}", fmt_opt(metrics.credit_spread_bps, 2))?;
        write!(f, "  Rating bucket        {}", self.rating)?;
        if let Some(market) = self.market_spread_bps {
            write!(f, "\n  Market spread (bps)  {:.2}", market)?;
        }
        if let Some(signal) = &self.signal {
            write!(f, "\n  Signal               {}", signal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::firm;
    use merton_models::signals::Classification;

    #[test]
    fn test_evaluate_with_market_spread() {
        let args = EvaluateArgs {
            firm: firm(100.0, 0.40, 80.0),
            market_spread: Some(180.0),
        };
        let summary = evaluate(&args, &AnalysisSettings::default()).unwrap();

        assert_eq!(summary.rating, CreditRating::BBB);
        let signal = summary.signal.unwrap();
        assert_eq!(signal.classification, Classification::LongStrong);

        let table = summary.to_string();
        assert!(table.contains("Signal"));
        assert!(table.contains("BBB"));
    }

    #[test]
    fn test_evaluate_without_market_spread() {
        let args = EvaluateArgs {
            firm: firm(100.0, 0.40, 80.0),
            market_spread: None,
        };
        let summary = evaluate(&args, &AnalysisSettings::default()).unwrap();
        assert!(summary.signal.is_none());
        assert!(!summary.to_string().contains("Signal"));
    }

    #[test]
    fn test_evaluate_rejects_bad_volatility() {
        let args = EvaluateArgs {
            firm: firm(100.0, 0.0, 80.0),
            market_spread: None,
        };
        assert!(evaluate(&args, &AnalysisSettings::default()).is_err());
    }
}
