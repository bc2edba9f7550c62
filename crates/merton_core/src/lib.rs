//! # merton_core: Numerical Foundation for the Merton Credit Signal Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! merton_core is the bottom layer of the workspace, providing:
//! - Standard normal distribution functions (`math::distributions`)
//! - Multi-dimensional root finding and bounded least-squares (`math::solvers`)
//! - Validated market inputs: `MarketInputs` (`types::inputs`)
//! - Error types: `InputError`, `SolverError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other merton_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use merton_core::math::distributions::norm_cdf;
//! use merton_core::types::MarketInputs;
//!
//! let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
//! assert_eq!(inputs.debt_face(), 80.0);
//!
//! let p = norm_cdf(0.0_f64);
//! # assert!((p - 0.5).abs() < 1e-7);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `MarketInputs` and error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
