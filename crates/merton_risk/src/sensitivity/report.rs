//! Aggregated sensitivity report.

use std::fmt;

use merton_core::types::MarketInputs;
use merton_models::structural::Evaluation;

use super::engine::{SensitivityRow, StressOutcome};
use super::presets::StressScenario;
use super::robustness::RobustnessCheck;

/// Everything the sensitivity engine knows about one firm.
///
/// Built once by [`SensitivityEngine::generate_report`](super::SensitivityEngine::generate_report)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityReport {
    /// Unshocked inputs
    pub base_inputs: MarketInputs,
    /// Market spread the signal is measured against, in bps
    pub market_spread_bps: f64,
    /// Direct evaluation of the unshocked inputs
    pub base: Evaluation,
    /// Volatility grid rows, ascending shock
    pub volatility: Vec<SensitivityRow>,
    /// Debt grid rows, ascending shock
    pub debt: Vec<SensitivityRow>,
    /// Stress scenarios in preset order
    pub stress: Vec<StressOutcome>,
    /// Robustness verdict
    pub robustness: RobustnessCheck,
}

impl SensitivityReport {
    /// Stress outcome for `scenario`.
    pub fn stress_outcome(&self, scenario: StressScenario) -> Option<&StressOutcome> {
        self.stress.iter().find(|o| o.scenario == scenario)
    }

    /// Stress outcome by scenario name (case-insensitive).
    pub fn stress_by_name(&self, name: &str) -> Option<&StressOutcome> {
        StressScenario::from_name(name).and_then(|s| self.stress_outcome(s))
    }

    /// Number of grid rows and stress scenarios that failed.
    pub fn failed_points(&self) -> usize {
        let rows = self
            .volatility
            .iter()
            .chain(&self.debt)
            .filter(|r| r.is_failed())
            .count();
        rows + self.stress.iter().filter(|o| o.solution.is_none()).count()
    }
}

struct Opt(Option<f64>, usize);

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.*}", self.1, v),
            None => f.write_str("n/a"),
        }
    }
}

const RULE: &str = "----------------------------------------------------------------------";

impl fmt::Display for SensitivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VOLATILITY SENSITIVITY")?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "{:>8} {:>10} {:>14} {:>14}",
            "Shock %", "Sigma_E", "Spread (bps)", "Change (bps)"
        )?;
        for row in &self.volatility {
            writeln!(
                f,
                "{:>+8.0} {:>10.4} {:>14} {:>14}",
                row.shock_pct,
                row.shocked_value,
                Opt(row.theo_spread_bps(), 1).to_string(),
                Opt(row.spread_change_bps, 1).to_string(),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "DEBT SENSITIVITY")?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "{:>8} {:>16} {:>10} {:>14} {:>14}",
            "Shock %", "Debt", "Leverage", "Spread (bps)", "Change (bps)"
        )?;
        for row in &self.debt {
            writeln!(
                f,
                "{:>+8.0} {:>16.2} {:>10} {:>14} {:>14}",
                row.shock_pct,
                row.shocked_value,
                Opt(row.leverage, 3).to_string(),
                Opt(row.theo_spread_bps(), 1).to_string(),
                Opt(row.spread_change_bps, 1).to_string(),
            )?;
        }

        writeln!(f)?;
        writeln!(f, "STRESS SCENARIOS")?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "{:<16} {:>7} {:>7} {:>8} {:>14}",
            "Scenario", "Vol %", "Debt %", "DD", "Spread (bps)"
        )?;
        for outcome in &self.stress {
            writeln!(
                f,
                "{:<16} {:>+7.0} {:>+7.0} {:>8} {:>14}",
                outcome.scenario.name(),
                outcome.volatility_shock_pct(),
                outcome.debt_shock_pct(),
                Opt(outcome.metrics.distance_to_default, 2).to_string(),
                Opt(outcome.metrics.credit_spread_bps, 1).to_string(),
            )?;
        }

        let robustness = &self.robustness;
        writeln!(f)?;
        writeln!(f, "SIGNAL ROBUSTNESS")?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Base signal:   {}", robustness.base_classification)?;
        match robustness.base_spread_diff_bps {
            Some(diff) => writeln!(f, "Spread diff:   {:+.0} bps", diff)?,
            None => writeln!(f, "Spread diff:   n/a")?,
        }
        writeln!(
            f,
            "Robust:        {}",
            if robustness.is_robust { "YES" } else { "NO" }
        )?;
        writeln!(f, "Spread range:  {} bps", Opt(robustness.spread_range_bps, 0))?;
        writeln!(f, "Spread stdev:  {} bps", Opt(robustness.spread_std_bps, 0))?;
        for flip in &robustness.signal_flips {
            writeln!(f, "  flip at {:+.0}% vol -> {}", flip.shock_pct, flip.to)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::SensitivityEngine;

    fn report() -> SensitivityReport {
        let base = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
        SensitivityEngine::new(base).generate_report(150.0)
    }

    #[test]
    fn test_report_sections() {
        let report = report();
        assert_eq!(report.volatility.len(), 7);
        assert_eq!(report.debt.len(), 7);
        assert_eq!(report.stress.len(), 6);
        assert_eq!(report.robustness.rows.len(), 5);
        assert_eq!(report.market_spread_bps, 150.0);
        assert_eq!(report.failed_points(), 0);
    }

    #[test]
    fn test_stress_lookup() {
        let report = report();
        let severe = report.stress_by_name("Severe Stress").unwrap();
        assert_eq!(severe.scenario, StressScenario::Severe);
        assert!(report.stress_by_name("unknown").is_none());
        assert_eq!(
            report.stress_outcome(StressScenario::Base).unwrap().metrics,
            report.base.metrics
        );
    }

    #[test]
    fn test_display_contains_sections() {
        let text = report().to_string();
        for heading in [
            "VOLATILITY SENSITIVITY",
            "DEBT SENSITIVITY",
            "STRESS SCENARIOS",
            "SIGNAL ROBUSTNESS",
            "Extreme Stress",
        ] {
            assert!(text.contains(heading), "missing {}", heading);
        }
    }

    #[test]
    fn test_optional_formatting() {
        assert_eq!(Opt(Some(1.2345), 2).to_string(), "1.23");
        assert_eq!(Opt(None, 2).to_string(), "n/a");
    }
}
