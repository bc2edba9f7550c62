//! Core value types and error types.
//!
//! This module provides:
//! - `inputs`: the validated `MarketInputs` record consumed by every model layer
//! - `error`: structured errors for input validation and numerical solvers
//!
//! # Re-exports
//!
//! - [`MarketInputs`] from `inputs`
//! - [`InputError`], [`SolverError`] from `error`

pub mod error;
pub mod inputs;

pub use error::{InputError, SolverError};
pub use inputs::MarketInputs;
