//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! This module provides the [`LevenbergMarquardtSolver`] for minimising a sum
//! of squared residuals, with an optional box constraint.
//!
//! # Algorithm
//!
//! The Levenberg-Marquardt algorithm combines Gauss-Newton and gradient descent:
//!
//! ```text
//! (J^T J + λ·diag(J^T J)) δ = −J^T r
//! p_{n+1} = P(p_n + δ)
//! ```
//!
//! where:
//! - `J` is the Jacobian matrix of residuals
//! - `r` is the residual vector
//! - `λ` is the damping factor (adjusted during iteration)
//! - `δ` is the parameter update step
//! - `P` is the projection onto the parameter box (identity when unbounded)
//!
//! Scaling the damping by the diagonal of `J^T J` (Marquardt's variant) keeps
//! steps sensible when parameters live on very different scales.
//!
//! # Example
//!
//! ```
//! use merton_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Fit y = a * exp(-b * x) to data
//! let x_data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
//! let y_data = vec![1.0, 0.37, 0.14, 0.05, 0.02];
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//!
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     let (a, b) = (params[0], params[1]);
//!     x_data.iter().zip(&y_data).map(|(&x, &y)| a * (-b * x).exp() - y).collect()
//! };
//!
//! let result = solver.solve(residuals, vec![1.0, 1.0]).unwrap();
//! assert!(result.converged);
//! ```

use super::bounds::ParameterBounds;
use super::linalg::{forward_difference_jacobian, solve_cholesky, sum_of_squares};
use crate::types::SolverError;

/// Smallest diagonal weight used for Marquardt scaling.
const MIN_DIAG: f64 = 1e-12;

/// Configuration for Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig {
    /// Convergence tolerance on the residual norm.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor.
    pub max_lambda: f64,
    /// Tolerance for relative parameter change convergence.
    pub param_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-10,
            max_lambda: 1e10,
            param_tolerance: 1e-10,
        }
    }
}

impl LMConfig {
    /// Create a new LM configuration.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Create a high precision configuration.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 500,
            param_tolerance: 1e-14,
            ..Default::default()
        }
    }
}

/// Result of Levenberg-Marquardt optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final optimised parameters.
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub residual_ss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a stopping criterion was met before the iteration cap.
    pub converged: bool,
    /// Final lambda value.
    pub final_lambda: f64,
}

impl LMResult {
    /// Create a new LM result.
    pub fn new(
        params: Vec<f64>,
        residual_ss: f64,
        iterations: usize,
        converged: bool,
        final_lambda: f64,
    ) -> Self {
        Self {
            params,
            residual_ss,
            iterations,
            converged,
            final_lambda,
        }
    }
}

/// Levenberg-Marquardt nonlinear least-squares solver.
///
/// Solves optimisation problems of the form:
/// ```text
/// min_p ||f(p)||^2        (optionally subject to lower ≤ p ≤ upper)
/// ```
///
/// A trial point with non-finite residuals is rejected like any other
/// non-improving step.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a new LM solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: LMConfig::default(),
        }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Solve the unconstrained nonlinear least-squares problem.
    ///
    /// # Returns
    ///
    /// * `Ok(LMResult)` - Optimisation result with final parameters
    /// * `Err(SolverError)` - Empty parameter/residual vectors or non-finite start
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        self.run(&residuals, initial_params, None)
    }

    /// Solve the nonlinear least-squares problem inside a box.
    ///
    /// The initial point and every trial point are projected onto `bounds`.
    ///
    /// # Returns
    ///
    /// * `Ok(LMResult)` - Optimisation result; `params` lies inside `bounds`
    /// * `Err(SolverError::DimensionMismatch)` - `bounds` and parameters differ in length
    /// * `Err(SolverError)` - Empty parameter/residual vectors or non-finite start
    pub fn solve_bounded<F>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
        bounds: &ParameterBounds,
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        if bounds.len() != initial_params.len() {
            return Err(SolverError::DimensionMismatch {
                expected: initial_params.len(),
                got: bounds.len(),
            });
        }
        self.run(&residuals, initial_params, Some(bounds))
    }

    fn run<F>(
        &self,
        residuals: &F,
        initial_params: Vec<f64>,
        bounds: Option<&ParameterBounds>,
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }

        let mut params = initial_params;
        if let Some(b) = bounds {
            b.project(&mut params);
        }
        let mut lambda = self.config.initial_lambda;

        let mut r = residuals(&params);
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty residual vector".to_string(),
            ));
        }

        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Residuals are non-finite at the initial point".to_string(),
            ));
        }

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(LMResult::new(params, ss, iteration, true, lambda));
            }

            let jacobian = forward_difference_jacobian(residuals, &params, &r);

            let delta = match solve_normal_equations(&jacobian, &r, lambda, n_params) {
                Some(d) => d,
                None => {
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    continue;
                }
            };

            let mut new_params: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            if let Some(b) = bounds {
                b.project(&mut new_params);
            }

            // Relative change of the (projected) step
            let param_change = params
                .iter()
                .zip(&new_params)
                .map(|(p, q)| (q - p) * (q - p))
                .sum::<f64>()
                .sqrt();
            let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if param_change / param_norm < self.config.param_tolerance {
                return Ok(LMResult::new(params, ss, iteration, true, lambda));
            }

            let new_r = residuals(&new_params);
            let new_ss = sum_of_squares(&new_r);

            if new_ss.is_finite() && new_ss < ss {
                params = new_params;
                r = new_r;
                ss = new_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
            } else {
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        // Return result even if not converged
        Ok(LMResult::new(
            params,
            ss,
            self.config.max_iterations,
            false,
            lambda,
        ))
    }
}

/// Solve the damped normal equations (J^T J + λ·diag(J^T J)) δ = −J^T r.
fn solve_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let n_residuals = residuals.len();

    let mut jtj = vec![vec![0.0; n_params]; n_params];
    for i in 0..n_params {
        for j in 0..n_params {
            let mut sum = 0.0;
            for k in 0..n_residuals {
                sum += jacobian[k][i] * jacobian[k][j];
            }
            jtj[i][j] = sum;
        }
    }

    for i in 0..n_params {
        jtj[i][i] += lambda * jtj[i][i].max(MIN_DIAG);
    }

    let mut jtr = vec![0.0; n_params];
    for i in 0..n_params {
        let mut sum = 0.0;
        for k in 0..n_residuals {
            sum += jacobian[k][i] * residuals[k];
        }
        jtr[i] = -sum; // Negative for descent direction
    }

    solve_cholesky(&jtj, &jtr)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // LMConfig Tests
    // ========================================

    #[test]
    fn test_config_default() {
        let config = LMConfig::default();
        assert!((config.tolerance - 1e-10).abs() < 1e-15);
        assert_eq!(config.max_iterations, 100);
        assert!((config.initial_lambda - 1e-3).abs() < 1e-18);
        assert_eq!(config.lambda_up, 10.0);
        assert_eq!(config.lambda_down, 0.1);
    }

    #[test]
    fn test_config_new() {
        let config = LMConfig::new(1e-12, 500);
        assert!((config.tolerance - 1e-12).abs() < 1e-20);
        assert_eq!(config.max_iterations, 500);
    }

    #[test]
    fn test_config_high_precision() {
        let config = LMConfig::high_precision();
        assert!(config.tolerance < 1e-12);
        assert!(config.max_iterations >= 500);
    }

    // ========================================
    // Unconstrained Tests
    // ========================================

    #[test]
    fn test_solve_simple_linear() {
        let residuals = |params: &[f64]| -> Vec<f64> { vec![params[0] - 2.0, params[1] - 3.0] };

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve(residuals, vec![0.0, 0.0]).unwrap();

        assert!(result.converged);
        assert!((result.params[0] - 2.0).abs() < 1e-6);
        assert!((result.params[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_solve_badly_scaled_parameters() {
        // One parameter of order 1e9, one of order 1e-1
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] / 1e9 - 2.5, 10.0 * (p[1] - 0.3)] };

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve(residuals, vec![1e9, 0.1]).unwrap();

        assert!((result.params[0] / 2.5e9 - 1.0).abs() < 1e-6);
        assert!((result.params[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_solve_already_optimal() {
        let residuals = |params: &[f64]| -> Vec<f64> { vec![params[0] - 5.0] };

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve(residuals, vec![5.0]).unwrap();

        assert!(result.converged);
        assert!(result.iterations <= 1);
    }

    #[test]
    fn test_solve_empty_params() {
        let residuals = |_params: &[f64]| -> Vec<f64> { vec![1.0] };

        let solver = LevenbergMarquardtSolver::with_defaults();
        assert!(solver.solve(residuals, vec![]).is_err());
    }

    #[test]
    fn test_solve_non_finite_start() {
        let residuals = |_params: &[f64]| -> Vec<f64> { vec![f64::INFINITY] };

        let solver = LevenbergMarquardtSolver::with_defaults();
        assert!(solver.solve(residuals, vec![1.0]).is_err());
    }

    // ========================================
    // Bounded Tests
    // ========================================

    #[test]
    fn test_bounded_interior_optimum_matches_unbounded() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] - 2.0, p[1] - 3.0] };
        let bounds = ParameterBounds::new(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve_bounded(residuals, vec![1.0, 1.0], &bounds).unwrap();

        assert!((result.params[0] - 2.0).abs() < 1e-6);
        assert!((result.params[1] - 3.0).abs() < 1e-6);
        assert!(result.residual_ss < 1e-12);
    }

    #[test]
    fn test_bounded_optimum_on_edge() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] + 1.0] };
        let bounds = ParameterBounds::new(vec![0.5], vec![4.0]).unwrap();

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve_bounded(residuals, vec![3.0], &bounds).unwrap();

        assert_eq!(result.params[0], 0.5);
        assert!((result.residual_ss - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_projects_initial_point() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] - 1.0] };
        let bounds = ParameterBounds::new(vec![0.0], vec![2.0]).unwrap();

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve_bounded(residuals, vec![100.0], &bounds).unwrap();

        assert!(bounds.contains(&result.params));
        assert!((result.params[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounded_dimension_mismatch() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0]] };
        let bounds = ParameterBounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();

        let solver = LevenbergMarquardtSolver::with_defaults();
        let err = solver.solve_bounded(residuals, vec![0.5], &bounds).unwrap_err();
        assert!(matches!(err, SolverError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_rejects_non_finite_trial_points() {
        // Residual blows up to infinity for p > 1; minimum at p = 0.9
        let residuals = |p: &[f64]| -> Vec<f64> {
            if p[0] > 1.0 {
                vec![f64::INFINITY]
            } else {
                vec![p[0] - 0.9]
            }
        };

        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver.solve(residuals, vec![0.0]).unwrap();
        assert!((result.params[0] - 0.9).abs() < 1e-6);
    }

    // ========================================
    // Normal Equation Tests
    // ========================================

    #[test]
    fn test_normal_equations_marquardt_scaling() {
        // J = diag(2, 1), r = (2, 1), λ = 1  =>  δ_i = -J_ii r_i / (2 J_ii²)
        let jacobian = vec![vec![2.0, 0.0], vec![0.0, 1.0]];
        let delta = solve_normal_equations(&jacobian, &[2.0, 1.0], 1.0, 2).unwrap();
        assert!((delta[0] + 0.5).abs() < 1e-12);
        assert!((delta[1] + 0.5).abs() < 1e-12);
    }
}
