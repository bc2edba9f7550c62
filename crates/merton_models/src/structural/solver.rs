//! Multi-strategy solver for the Merton system.
//!
//! The solve is organised as a grid of attempts:
//!
//! 1. Ordered initial guesses ([`GuessRegime`]): standard, distressed,
//!    high-leverage, high-volatility.
//! 2. For each guess, ordered strategies ([`Strategy`]): damped Newton root
//!    finding, then bounded least-squares.
//! 3. The first accepted attempt wins. If none is accepted, a closed-form
//!    approximation is returned and tagged
//!    [`SolverMethod::FallbackApproximation`].
//!
//! [`MertonSolver::solve`] therefore always returns a finite `(V, σV)` with
//! both components strictly positive.
//!
//! ## Fixed constants
//!
//! | Constant                     | Value            |
//! |------------------------------|------------------|
//! | Root-find tolerance          | 1e-6 (absolute)  |
//! | Newton iterations            | 100              |
//! | Line-search halvings         | 40               |
//! | Finite-difference step       | 1e-8·max(|x|, 1) |
//! | Optimiser acceptance (SSR)   | 1e-4             |
//! | LM iterations                | 500              |
//! | LM internal tolerance        | 1e-12            |
//! | LM initial damping           | 1e-3 (×10 / ×0.1)|

use std::fmt;

use merton_core::math::solvers::{
    LMConfig, LevenbergMarquardtSolver, NewtonSystemSolver, ParameterBounds, SolverConfig,
};
use merton_core::types::MarketInputs;
use tracing::debug;

use super::residuals::MertonSystem;

/// Absolute tolerance for each residual in root finding.
pub const ROOT_TOLERANCE: f64 = 1e-6;

/// Sum-of-squared-residuals threshold for accepting an optimiser result.
pub const OPTIMIZER_ACCEPTANCE: f64 = 1e-4;

const ROOT_MAX_ITERATIONS: usize = 100;
const ROOT_MAX_BACKTRACKS: usize = 40;
const LM_MAX_ITERATIONS: usize = 500;
const LM_TOLERANCE: f64 = 1e-12;
const LM_INITIAL_LAMBDA: f64 = 1e-3;

/// Asset volatility search interval for the bounded optimiser.
const ASSET_VOL_BOUNDS: (f64, f64) = (0.01, 3.0);

/// Which tier of the solver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolverMethod {
    /// Damped Newton root finding converged.
    RootFind,
    /// Bounded least-squares reached the acceptance threshold.
    BoundedOptimize,
    /// No strategy was accepted; closed-form approximation used.
    FallbackApproximation,
    /// The inputs could not be evaluated at all (sensitivity rows only).
    Failed,
}

impl SolverMethod {
    /// Stable lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverMethod::RootFind => "root_find",
            SolverMethod::BoundedOptimize => "bounded_optimize",
            SolverMethod::FallbackApproximation => "fallback_approximation",
            SolverMethod::Failed => "failed",
        }
    }

    /// Whether the residual system was actually solved to tolerance.
    pub fn is_converged(&self) -> bool {
        matches!(self, SolverMethod::RootFind | SolverMethod::BoundedOptimize)
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implied asset value and volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverResult {
    /// Implied asset value V (> 0).
    pub asset_value: f64,
    /// Implied asset volatility σV (> 0).
    pub asset_vol: f64,
    /// Tier that produced the result.
    pub method: SolverMethod,
}

/// Starting-point regimes, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuessRegime {
    /// `(E + D, σE·E/(E + D))`
    Standard,
    /// `(E + 0.8·D, 0.25)`
    Distressed,
    /// `(E + 0.5·D, 0.5·σE)`
    HighLeverage,
    /// `(E + D, 0.40)`
    HighVolatility,
}

impl GuessRegime {
    /// All regimes in the order they are tried.
    pub const ALL: [GuessRegime; 4] = [
        GuessRegime::Standard,
        GuessRegime::Distressed,
        GuessRegime::HighLeverage,
        GuessRegime::HighVolatility,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            GuessRegime::Standard => "standard",
            GuessRegime::Distressed => "distressed",
            GuessRegime::HighLeverage => "high_leverage",
            GuessRegime::HighVolatility => "high_volatility",
        }
    }

    /// Initial `(V, σV)` for this regime.
    pub fn initial_guess(&self, inputs: &MarketInputs) -> (f64, f64) {
        let e = inputs.equity_value();
        let d = inputs.debt_face();
        let total = inputs.enterprise_value();
        let vol_e = inputs.equity_vol();
        match self {
            GuessRegime::Standard => (total, vol_e * e / total),
            GuessRegime::Distressed => (e + 0.8 * d, 0.25),
            GuessRegime::HighLeverage => (e + 0.5 * d, 0.5 * vol_e),
            GuessRegime::HighVolatility => (total, 0.40),
        }
    }
}

/// Box for the bounded optimiser: `V ∈ [0.1·E, 5·(E + D)]`, `σV ∈ [0.01, 3.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    /// Asset value interval.
    pub asset_value: (f64, f64),
    /// Asset volatility interval.
    pub asset_vol: (f64, f64),
}

impl SearchBounds {
    /// Bounds derived from the observed equity and debt.
    pub fn for_inputs(inputs: &MarketInputs) -> Self {
        Self {
            asset_value: (
                0.1 * inputs.equity_value(),
                (5.0 * inputs.enterprise_value()).min(f64::MAX),
            ),
            asset_vol: ASSET_VOL_BOUNDS,
        }
    }
}

/// Solving strategies, tried in declaration order for each guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Derivative-free damped Newton on the residual pair.
    RootFind,
    /// Bounded Levenberg-Marquardt on the sum of squared residuals.
    BoundedOptimize,
}

impl Strategy {
    /// All strategies in the order they are tried.
    pub const ALL: [Strategy; 2] = [Strategy::RootFind, Strategy::BoundedOptimize];

    /// Method tag recorded when this strategy is accepted.
    pub fn method(&self) -> SolverMethod {
        match self {
            Strategy::RootFind => SolverMethod::RootFind,
            Strategy::BoundedOptimize => SolverMethod::BoundedOptimize,
        }
    }

    /// Run the strategy from `guess`; `Some((V, σV))` only when accepted.
    pub fn attempt(
        &self,
        system: &MertonSystem,
        guess: (f64, f64),
        bounds: &SearchBounds,
    ) -> Option<(f64, f64)> {
        match self {
            Strategy::RootFind => root_find(system, guess, bounds),
            Strategy::BoundedOptimize => bounded_optimize(system, guess, bounds),
        }
    }
}

/// Damped Newton from `guess`. Bounds are not imposed.
pub fn root_find(
    system: &MertonSystem,
    guess: (f64, f64),
    _bounds: &SearchBounds,
) -> Option<(f64, f64)> {
    let config = SolverConfig::new(ROOT_TOLERANCE, ROOT_MAX_ITERATIONS)
        .with_max_backtracks(ROOT_MAX_BACKTRACKS);
    let solver = NewtonSystemSolver::new(config);

    let f = |p: &[f64]| system.residuals(p[0], p[1]).to_vec();
    let result = solver.solve(f, &[guess.0, guess.1]).ok()?;

    let (asset_value, asset_vol) = (result.x[0], result.x[1]);
    let accepted = asset_value > 0.0 && asset_vol > 0.0 && result.max_residual() < ROOT_TOLERANCE;
    accepted.then_some((asset_value, asset_vol))
}

/// Bounded least-squares from `guess`.
///
/// The optimiser works on `(V / (E + D), σV)` so both parameters are of
/// order one; acceptance is judged on the unscaled residuals.
pub fn bounded_optimize(
    system: &MertonSystem,
    guess: (f64, f64),
    bounds: &SearchBounds,
) -> Option<(f64, f64)> {
    let scale = system.equity_value() + system.debt_face();
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }

    let box_bounds = ParameterBounds::new(
        vec![bounds.asset_value.0 / scale, bounds.asset_vol.0],
        vec![bounds.asset_value.1 / scale, bounds.asset_vol.1],
    )
    .ok()?;

    let config = LMConfig {
        tolerance: LM_TOLERANCE,
        max_iterations: LM_MAX_ITERATIONS,
        initial_lambda: LM_INITIAL_LAMBDA,
        lambda_up: 10.0,
        lambda_down: 0.1,
        ..Default::default()
    };
    let solver = LevenbergMarquardtSolver::new(config);

    let f = |p: &[f64]| system.residuals(p[0] * scale, p[1]).to_vec();
    let result = solver
        .solve_bounded(f, vec![guess.0 / scale, guess.1], &box_bounds)
        .ok()?;

    let asset_value = result.params[0] * scale;
    let asset_vol = result.params[1];
    let objective = system.sum_of_squares(asset_value, asset_vol);

    let accepted = asset_value > 0.0 && asset_vol > 0.0 && objective < OPTIMIZER_ACCEPTANCE;
    accepted.then_some((asset_value, asset_vol))
}

/// Closed-form approximation used when no strategy is accepted.
///
/// `V = E + D`; `σV = σE·E/(E + D)` (or `0.5·σE` when `E + D` vanishes),
/// floored at 0.15 for firms with more debt than equity and 0.01 otherwise.
pub fn fallback_approximation(inputs: &MarketInputs) -> SolverResult {
    let e = inputs.equity_value();
    let d = inputs.debt_face();
    let total = inputs.enterprise_value();

    let naive = if total.abs() < f64::EPSILON {
        inputs.equity_vol() * 0.5
    } else {
        inputs.equity_vol() * e / total
    };
    let floor = if e < d { 0.15 } else { 0.01 };

    SolverResult {
        asset_value: total,
        asset_vol: naive.max(floor),
        method: SolverMethod::FallbackApproximation,
    }
}

/// Multi-strategy Merton solver.
///
/// # Examples
/// ```
/// use merton_core::types::MarketInputs;
/// use merton_models::structural::MertonSolver;
///
/// let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
/// let result = MertonSolver::new().solve(&inputs);
///
/// assert!(result.asset_value > 100.0);
/// assert!(result.asset_vol > 0.0 && result.asset_vol < 0.40);
/// ```
#[derive(Debug, Clone)]
pub struct MertonSolver {
    guesses: Vec<GuessRegime>,
    strategies: Vec<Strategy>,
}

impl Default for MertonSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MertonSolver {
    /// Solver trying every regime and every strategy.
    pub fn new() -> Self {
        Self {
            guesses: GuessRegime::ALL.to_vec(),
            strategies: Strategy::ALL.to_vec(),
        }
    }

    /// Restrict (or reorder) the strategies tried for each guess.
    pub fn with_strategies(mut self, strategies: &[Strategy]) -> Self {
        self.strategies = strategies.to_vec();
        self
    }

    /// Restrict (or reorder) the initial-guess regimes.
    pub fn with_guesses(mut self, guesses: &[GuessRegime]) -> Self {
        self.guesses = guesses.to_vec();
        self
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Regimes in the order they are tried.
    pub fn guesses(&self) -> &[GuessRegime] {
        &self.guesses
    }

    /// Solve for implied `(V, σV)`. Never fails.
    pub fn solve(&self, inputs: &MarketInputs) -> SolverResult {
        let system = MertonSystem::from_inputs(inputs);
        let bounds = SearchBounds::for_inputs(inputs);

        for regime in &self.guesses {
            let guess = regime.initial_guess(inputs);
            for strategy in &self.strategies {
                if let Some((asset_value, asset_vol)) = strategy.attempt(&system, guess, &bounds) {
                    let method = strategy.method();
                    debug!(
                        "Merton solve accepted: regime={}, method={}, V={:.6e}, sigma_V={:.6}",
                        regime.name(),
                        method,
                        asset_value,
                        asset_vol
                    );
                    return SolverResult {
                        asset_value,
                        asset_vol,
                        method,
                    };
                }
            }
        }

        let result = fallback_approximation(inputs);
        debug!(
            "Merton solve fell back to approximation: V={:.6e}, sigma_V={:.6}",
            result.asset_value, result.asset_vol
        );
        result
    }
}
