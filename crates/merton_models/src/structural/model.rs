//! Single-point structural model pipeline: solve, then derive metrics.

use merton_core::types::MarketInputs;

use super::metrics::{leverage, ModelParams, RiskMetrics};
use super::solver::{MertonSolver, SolverResult};

/// Output of one structural-model evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Inputs the evaluation was run on.
    pub inputs: MarketInputs,
    /// Implied asset value and volatility.
    pub solution: SolverResult,
    /// Risk metrics at the solution.
    pub metrics: RiskMetrics,
    /// Model leverage `D / V`.
    pub leverage: Option<f64>,
}

/// Solver and metric parameters bundled for repeated evaluation.
///
/// # Examples
/// ```
/// use merton_core::types::MarketInputs;
/// use merton_models::structural::StructuralModel;
///
/// let model = StructuralModel::default();
/// let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
/// let eval = model.evaluate(&inputs);
///
/// assert!(eval.metrics.distance_to_default.unwrap() > 2.0);
/// assert!(eval.leverage.unwrap() < 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    solver: MertonSolver,
    params: ModelParams,
}

impl StructuralModel {
    /// Model with the given solver and parameters.
    pub fn new(solver: MertonSolver, params: ModelParams) -> Self {
        Self { solver, params }
    }

    /// Model with the default solver and the given parameters.
    pub fn with_params(params: ModelParams) -> Self {
        Self {
            solver: MertonSolver::new(),
            params,
        }
    }

    /// Metric parameters.
    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Underlying solver.
    pub fn solver(&self) -> &MertonSolver {
        &self.solver
    }

    /// Solve and compute metrics for `inputs`.
    pub fn evaluate(&self, inputs: &MarketInputs) -> Evaluation {
        let solution = self.solver.solve(inputs);
        let metrics = RiskMetrics::from_solution(&solution, inputs, &self.params);
        Evaluation {
            inputs: *inputs,
            solution,
            metrics,
            leverage: leverage(inputs.debt_face(), solution.asset_value),
        }
    }
}
