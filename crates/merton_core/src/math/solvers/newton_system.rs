//! Damped Newton solver for square nonlinear systems.

use super::linalg::{forward_difference_jacobian, max_abs, solve_linear, sum_of_squares};
use super::SolverConfig;
use crate::types::SolverError;

/// Converged state of a [`NewtonSystemSolver`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonSystemResult {
    /// Root estimate.
    pub x: Vec<f64>,
    /// Residual vector `f(x)` at the root estimate.
    pub residuals: Vec<f64>,
    /// Number of Newton iterations performed.
    pub iterations: usize,
}

impl NewtonSystemResult {
    /// Largest absolute residual component.
    pub fn max_residual(&self) -> f64 {
        max_abs(&self.residuals)
    }
}

/// Derivative-free Newton iteration for `f(x) = 0`, `f: ℝⁿ → ℝⁿ`.
///
/// Each iteration solves `J δ = −f(x)` with a forward-difference Jacobian,
/// then backtracks along `δ` (halving the step up to `max_backtracks`
/// times) until the squared residual norm strictly decreases. A trial point
/// whose residuals are non-finite is treated as a rejected step, so callers
/// can encode infeasible regions as large or non-finite residuals.
///
/// Convergence is declared when every component satisfies
/// `|f_i(x)| < tolerance`.
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::{NewtonSystemSolver, SolverConfig};
///
/// // x·y = 6, x + y = 5  =>  (2, 3) from a guess near it
/// let f = |p: &[f64]| vec![p[0] * p[1] - 6.0, p[0] + p[1] - 5.0];
///
/// let solver = NewtonSystemSolver::new(SolverConfig::default());
/// let result = solver.solve(f, &[1.5, 3.5]).unwrap();
/// assert!((result.x[0] - 2.0).abs() < 1e-8);
/// assert!((result.x[1] - 3.0).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonSystemSolver {
    config: SolverConfig,
}

impl NewtonSystemSolver {
    /// Create a new solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find a root of `f` starting from `x0`.
    ///
    /// # Returns
    ///
    /// * `Ok(NewtonSystemResult)` - every `|f_i(x)| < tolerance`
    /// * `Err(SolverError::DimensionMismatch)` - `f` is not square at `x0`
    /// * `Err(SolverError::NumericalInstability)` - `f(x0)` is non-finite
    /// * `Err(SolverError::SingularJacobian)` - the Newton system could not be solved
    /// * `Err(SolverError::LineSearchFailed)` - no step reduced the residual
    /// * `Err(SolverError::MaxIterationsExceeded)` - iteration cap reached
    pub fn solve<F>(&self, f: F, x0: &[f64]) -> Result<NewtonSystemResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        if x0.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }

        let mut x = x0.to_vec();
        let mut r = f(&x);
        if r.len() != x.len() {
            return Err(SolverError::DimensionMismatch {
                expected: x.len(),
                got: r.len(),
            });
        }
        if !r.iter().all(|v| v.is_finite()) {
            return Err(SolverError::NumericalInstability(
                "Residuals are non-finite at the initial point".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);

        for iteration in 0..self.config.max_iterations {
            if max_abs(&r) < self.config.tolerance {
                return Ok(NewtonSystemResult {
                    x,
                    residuals: r,
                    iterations: iteration,
                });
            }

            let jacobian = forward_difference_jacobian(&f, &x, &r);
            let rhs: Vec<f64> = r.iter().map(|v| -v).collect();
            let delta = solve_linear(&jacobian, &rhs)
                .ok_or(SolverError::SingularJacobian { iteration })?;

            let (x_new, r_new, ss_new) = self
                .backtrack(&f, &x, &delta, ss)
                .ok_or(SolverError::LineSearchFailed { iteration })?;

            x = x_new;
            r = r_new;
            ss = ss_new;
        }

        if max_abs(&r) < self.config.tolerance {
            return Ok(NewtonSystemResult {
                x,
                residuals: r,
                iterations: self.config.max_iterations,
            });
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Halve the step along `delta` until the squared residual norm decreases.
    fn backtrack<F>(
        &self,
        f: &F,
        x: &[f64],
        delta: &[f64],
        ss: f64,
    ) -> Option<(Vec<f64>, Vec<f64>, f64)>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let mut step = 1.0;
        for _ in 0..=self.config.max_backtracks {
            let trial: Vec<f64> = x.iter().zip(delta).map(|(xi, di)| xi + step * di).collect();
            let r_trial = f(&trial);
            let ss_trial = sum_of_squares(&r_trial);
            if ss_trial.is_finite() && ss_trial < ss {
                return Some((trial, r_trial, ss_trial));
            }
            step *= 0.5;
        }
        None
    }
}
