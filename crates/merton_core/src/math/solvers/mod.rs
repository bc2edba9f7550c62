//! Multi-dimensional root-finding and least-squares solvers.
//!
//! The structural model reduces to a square nonlinear system in two unknowns
//! whose residuals are only available as black-box evaluations. This module
//! provides the two numerical tiers used to solve it:
//!
//! ## Available Solvers
//!
//! ### Root-Finding
//!
//! - [`NewtonSystemSolver`]: damped Newton iteration with a forward-difference
//!   Jacobian and backtracking line search
//!
//! ### Optimisation
//!
//! - [`LevenbergMarquardtSolver`]: nonlinear least-squares, optionally
//!   restricted to a box via [`ParameterBounds`]
//!
//! ## Configuration
//!
//! The Newton solver uses [`SolverConfig`] for:
//! - `tolerance`: absolute residual tolerance (default: 1e-10)
//! - `max_iterations`: maximum Newton iterations (default: 100)
//! - `max_backtracks`: maximum step halvings per iteration (default: 40)
//!
//! The LM solver uses [`LMConfig`] with additional parameters for damping control.
//!
//! ## Examples
//!
//! ### Root-Finding
//!
//! ```
//! use merton_core::math::solvers::{NewtonSystemSolver, SolverConfig};
//!
//! // x² + y² = 4, x = y  =>  x = y = √2
//! let f = |p: &[f64]| vec![p[0] * p[0] + p[1] * p[1] - 4.0, p[0] - p[1]];
//!
//! let solver = NewtonSystemSolver::new(SolverConfig::default());
//! let result = solver.solve(f, &[1.0, 2.0]).unwrap();
//!
//! assert!((result.x[0] - std::f64::consts::SQRT_2).abs() < 1e-8);
//! ```
//!
//! ### Bounded Least-Squares
//!
//! ```
//! use merton_core::math::solvers::{LevenbergMarquardtSolver, ParameterBounds};
//!
//! // Unconstrained optimum (2, 3) lies outside the box; the solver stops on its edge
//! let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] - 2.0, p[1] - 3.0] };
//! let bounds = ParameterBounds::new(vec![0.0, 0.0], vec![1.0, 5.0]).unwrap();
//!
//! let solver = LevenbergMarquardtSolver::with_defaults();
//! let result = solver.solve_bounded(residuals, vec![0.5, 0.5], &bounds).unwrap();
//!
//! assert!((result.params[0] - 1.0).abs() < 1e-9);
//! assert!((result.params[1] - 3.0).abs() < 1e-6);
//! ```

mod bounds;
mod config;
mod levenberg_marquardt;
mod linalg;
mod newton_system;

// Re-export public types at module level
pub use bounds::ParameterBounds;
pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use linalg::forward_difference_jacobian;
pub use newton_system::{NewtonSystemResult, NewtonSystemSolver};
