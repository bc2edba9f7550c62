//! Error types for structured error handling.
//!
//! This module provides:
//! - `InputError`: rejected market inputs, raised before any solve is attempted
//! - `SolverError`: failures inside the numerical solvers
//!
//! Solver errors never leave the model layer: the multi-strategy solver
//! treats them as "strategy not accepted" and moves on to the next one.

use thiserror::Error;

/// Invalid market inputs.
///
/// Raised synchronously by [`MarketInputs::new`](crate::types::MarketInputs::new)
/// and by the shock helpers that derive perturbed inputs from a base case.
///
/// # Examples
/// ```
/// use merton_core::types::InputError;
///
/// let err = InputError::NonPositive { field: "debt_face".to_string(), value: -1.0 };
/// assert_eq!(format!("{}", err), "Invalid input: debt_face must be positive, got -1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputError {
    /// A quantity that must be strictly positive was zero or negative.
    #[error("Invalid input: {field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field
        field: String,
        /// Value supplied
        value: f64,
    },

    /// A quantity was NaN or infinite.
    #[error("Invalid input: {field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field
        field: String,
        /// Value supplied
        value: f64,
    },
}

impl InputError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            InputError::NonPositive { field, .. } | InputError::NonFinite { field, .. } => field,
        }
    }
}

/// Numerical solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: iteration cap reached without convergence
/// - `SingularJacobian`: the linearised system could not be solved
/// - `LineSearchFailed`: no step along the Newton direction reduced the residual
/// - `DimensionMismatch`: parameter/bound/residual vector lengths disagree
/// - `InvalidBounds`: a lower bound exceeds its upper bound
/// - `NumericalInstability`: non-finite values or other breakdowns
///
/// # Examples
/// ```
/// use merton_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Jacobian (or normal-equation matrix) is singular.
    #[error("Singular Jacobian at iteration {iteration}")]
    SingularJacobian {
        /// Iteration at which the breakdown occurred
        iteration: usize,
    },

    /// Backtracking could not find a residual-reducing step.
    #[error("Line search failed at iteration {iteration}")]
    LineSearchFailed {
        /// Iteration at which the line search gave up
        iteration: usize,
    },

    /// Vector lengths disagree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Lower bound above upper bound.
    #[error("Invalid bounds for parameter {index}: [{lower}, {upper}]")]
    InvalidBounds {
        /// Parameter index
        index: usize,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}
