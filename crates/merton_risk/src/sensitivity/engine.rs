//! Sensitivity engine.
//!
//! Replays the structural pipeline on shocked copies of a base input set.
//! Every shock point is an independent evaluation; a point whose shocked
//! inputs are invalid is recorded as failed and the grid continues.

use merton_core::types::{InputError, MarketInputs};
use merton_models::signals::SignalThresholds;
use merton_models::structural::{
    leverage, Evaluation, RiskMetrics, SolverMethod, SolverResult, StructuralModel,
};
use tracing::warn;

use super::grid::{ShockDimension, ShockGrid};
use super::presets::StressScenario;
use super::report::SensitivityReport;
use super::robustness::RobustnessCheck;
use crate::parallel::parallel_map;

/// One point of a one-dimensional shock grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityRow {
    /// Shocked input
    pub dimension: ShockDimension,
    /// Shock in percent (`-30.0` = −30%)
    pub shock_pct: f64,
    /// Shocked σE or D
    pub shocked_value: f64,
    /// Implied asset value and volatility; `None` for failed points
    pub solution: Option<SolverResult>,
    /// Metrics at the solution
    pub metrics: RiskMetrics,
    /// Solver tier, `Failed` when the shocked inputs were invalid
    pub method: SolverMethod,
    /// `D_shocked / V` (debt rows only)
    pub leverage: Option<f64>,
    /// Theoretical spread minus the unshocked spread, in bps
    pub spread_change_bps: Option<f64>,
}

impl SensitivityRow {
    /// Implied asset value.
    pub fn asset_value(&self) -> Option<f64> {
        self.solution.map(|s| s.asset_value)
    }

    /// Implied asset volatility.
    pub fn asset_vol(&self) -> Option<f64> {
        self.solution.map(|s| s.asset_vol)
    }

    /// Theoretical spread in bps.
    pub fn theo_spread_bps(&self) -> Option<f64> {
        self.metrics.credit_spread_bps
    }

    /// Whether the point could not be evaluated.
    pub fn is_failed(&self) -> bool {
        self.method == SolverMethod::Failed
    }
}

/// Result of one combined stress scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressOutcome {
    /// Scenario applied
    pub scenario: StressScenario,
    /// Shocked equity volatility
    pub shocked_equity_vol: f64,
    /// Shocked debt face value
    pub shocked_debt_face: f64,
    /// Implied asset value and volatility; `None` if the scenario failed
    pub solution: Option<SolverResult>,
    /// Metrics at the solution
    pub metrics: RiskMetrics,
    /// Solver tier, `Failed` when the shocked inputs were invalid
    pub method: SolverMethod,
}

impl StressOutcome {
    /// Volatility shock in percent.
    pub fn volatility_shock_pct(&self) -> f64 {
        self.scenario.volatility_shock() * 100.0
    }

    /// Debt shock in percent.
    pub fn debt_shock_pct(&self) -> f64 {
        self.scenario.debt_shock() * 100.0
    }
}

/// Sensitivity and stress engine for one base input set.
///
/// # Examples
/// ```
/// use merton_core::types::MarketInputs;
/// use merton_risk::sensitivity::SensitivityEngine;
///
/// let base = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
/// let engine = SensitivityEngine::new(base);
///
/// let rows = engine.volatility_sensitivity();
/// assert_eq!(rows.len(), 7);
/// assert!(rows.iter().all(|r| !r.is_failed()));
/// ```
#[derive(Debug, Clone)]
pub struct SensitivityEngine {
    base: MarketInputs,
    model: StructuralModel,
    thresholds: SignalThresholds,
    volatility_grid: ShockGrid,
    debt_grid: ShockGrid,
    robustness_grid: ShockGrid,
}

impl SensitivityEngine {
    /// Engine with the default model, thresholds and grids.
    pub fn new(base: MarketInputs) -> Self {
        Self {
            base,
            model: StructuralModel::default(),
            thresholds: SignalThresholds::default(),
            volatility_grid: ShockGrid::default(),
            debt_grid: ShockGrid::default(),
            robustness_grid: ShockGrid::robustness(),
        }
    }

    /// Use `model` for every evaluation.
    pub fn with_model(mut self, model: StructuralModel) -> Self {
        self.model = model;
        self
    }

    /// Use `thresholds` for the robustness check.
    pub fn with_thresholds(mut self, thresholds: SignalThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the volatility grid.
    pub fn with_volatility_grid(mut self, grid: ShockGrid) -> Self {
        self.volatility_grid = grid;
        self
    }

    /// Replace the debt grid.
    pub fn with_debt_grid(mut self, grid: ShockGrid) -> Self {
        self.debt_grid = grid;
        self
    }

    /// Replace the robustness grid.
    pub fn with_robustness_grid(mut self, grid: ShockGrid) -> Self {
        self.robustness_grid = grid;
        self
    }

    /// Unshocked inputs.
    pub fn base(&self) -> &MarketInputs {
        &self.base
    }

    /// Thresholds used by the robustness check.
    pub fn thresholds(&self) -> &SignalThresholds {
        &self.thresholds
    }

    /// Direct evaluation of the unshocked inputs.
    pub fn base_evaluation(&self) -> Evaluation {
        self.model.evaluate(&self.base)
    }

    /// Scale σE by `1 + shock` for every point of the volatility grid.
    pub fn volatility_sensitivity(&self) -> Vec<SensitivityRow> {
        let base_spread = self.base_evaluation().metrics.credit_spread_bps;
        self.run_grid(ShockDimension::Volatility, &self.volatility_grid, base_spread)
    }

    /// Scale D by `1 + shock` for every point of the debt grid.
    pub fn debt_sensitivity(&self) -> Vec<SensitivityRow> {
        let base_spread = self.base_evaluation().metrics.credit_spread_bps;
        self.run_grid(ShockDimension::Debt, &self.debt_grid, base_spread)
    }

    /// Evaluate every preset stress scenario, in [`StressScenario::ALL`] order.
    pub fn stress_test(&self) -> Vec<StressOutcome> {
        parallel_map(&StressScenario::ALL, |scenario| self.run_scenario(*scenario))
    }

    /// Evaluate one stress scenario.
    pub fn run_scenario(&self, scenario: StressScenario) -> StressOutcome {
        let vol = self.base.equity_vol() * (1.0 + scenario.volatility_shock());
        let debt = self.base.debt_face() * (1.0 + scenario.debt_shock());

        let shocked = self
            .base
            .with_equity_vol(vol)
            .and_then(|inputs| inputs.with_debt_face(debt));

        match shocked {
            Ok(inputs) => {
                let eval = self.model.evaluate(&inputs);
                StressOutcome {
                    scenario,
                    shocked_equity_vol: vol,
                    shocked_debt_face: debt,
                    solution: Some(eval.solution),
                    metrics: eval.metrics,
                    method: eval.solution.method,
                }
            }
            Err(err) => {
                warn!("Stress scenario '{}' failed: {}", scenario.name(), err);
                StressOutcome {
                    scenario,
                    shocked_equity_vol: vol,
                    shocked_debt_face: debt,
                    solution: None,
                    metrics: RiskMetrics::undefined(),
                    method: SolverMethod::Failed,
                }
            }
        }
    }

    /// Check whether the signal against `market_spread_bps` survives the
    /// robustness grid.
    pub fn robustness_check(&self, market_spread_bps: f64) -> RobustnessCheck {
        let base_spread = self.base_evaluation().metrics.credit_spread_bps;
        self.robustness_from(base_spread, market_spread_bps)
    }

    /// Full report: both grids, stress scenarios and robustness.
    pub fn generate_report(&self, market_spread_bps: f64) -> SensitivityReport {
        let base = self.base_evaluation();
        let base_spread = base.metrics.credit_spread_bps;

        SensitivityReport {
            base_inputs: self.base,
            market_spread_bps,
            base,
            volatility: self.run_grid(
                ShockDimension::Volatility,
                &self.volatility_grid,
                base_spread,
            ),
            debt: self.run_grid(ShockDimension::Debt, &self.debt_grid, base_spread),
            stress: self.stress_test(),
            robustness: self.robustness_from(base_spread, market_spread_bps),
        }
    }

    fn robustness_from(&self, base_spread: Option<f64>, market_spread_bps: f64) -> RobustnessCheck {
        let rows = self.run_grid(ShockDimension::Volatility, &self.robustness_grid, base_spread);
        RobustnessCheck::assess(base_spread, rows, market_spread_bps, &self.thresholds)
    }

    fn run_grid(
        &self,
        dimension: ShockDimension,
        grid: &ShockGrid,
        base_spread: Option<f64>,
    ) -> Vec<SensitivityRow> {
        let mut rows = parallel_map(grid.shocks(), |&shock| {
            self.shock_row(dimension, shock, base_spread)
        });
        rows.sort_by(|a, b| a.shock_pct.total_cmp(&b.shock_pct));
        rows
    }

    fn shock_row(
        &self,
        dimension: ShockDimension,
        shock: f64,
        base_spread: Option<f64>,
    ) -> SensitivityRow {
        let (shocked_value, shocked): (f64, Result<MarketInputs, InputError>) = match dimension {
            ShockDimension::Volatility => {
                let vol = self.base.equity_vol() * (1.0 + shock);
                (vol, self.base.with_equity_vol(vol))
            }
            ShockDimension::Debt => {
                let debt = self.base.debt_face() * (1.0 + shock);
                (debt, self.base.with_debt_face(debt))
            }
        };
        let shock_pct = shock * 100.0;

        match shocked {
            Ok(inputs) => {
                let eval = self.model.evaluate(&inputs);
                let spread_change_bps = match (eval.metrics.credit_spread_bps, base_spread) {
                    (Some(spread), Some(base)) => Some(spread - base),
                    _ => None,
                };
                SensitivityRow {
                    dimension,
                    shock_pct,
                    shocked_value,
                    solution: Some(eval.solution),
                    metrics: eval.metrics,
                    method: eval.solution.method,
                    leverage: match dimension {
                        ShockDimension::Debt => {
                            leverage(inputs.debt_face(), eval.solution.asset_value)
                        }
                        ShockDimension::Volatility => None,
                    },
                    spread_change_bps,
                }
            }
            Err(err) => {
                warn!("{} shock {:+.1}% failed: {}", dimension, shock_pct, err);
                SensitivityRow {
                    dimension,
                    shock_pct,
                    shocked_value,
                    solution: None,
                    metrics: RiskMetrics::undefined(),
                    method: SolverMethod::Failed,
                    leverage: None,
                    spread_change_bps: None,
                }
            }
        }
    }
}
