//! # merton_models (L2: Business Logic)
//!
//! Merton structural credit model and trading-signal rules.
//!
//! This crate provides:
//! - The two-equation Merton residual system and its multi-strategy solver
//! - Credit risk metrics: distance to default, default probability, spread
//! - Signal classification and strength from the theoretical vs. market spread
//! - Rating buckets from model leverage
//!
//! ## Design Principles
//!
//! - **Total numerics**: the solver always returns a positive `(V, σV)`;
//!   undefined metrics are `None`, never errors
//! - **Enum-based strategies** tried in a fixed, documented order
//! - **Explicit configuration**: thresholds and model parameters are values
//!   passed in, never globals
//!
//! ## Example
//!
//! ```
//! use merton_core::types::MarketInputs;
//! use merton_models::signals::{Classification, SignalThresholds};
//! use merton_models::structural::StructuralModel;
//!
//! let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
//! let eval = StructuralModel::default().evaluate(&inputs);
//!
//! let theoretical = eval.metrics.credit_spread_bps.unwrap();
//! let signal = SignalThresholds::default().signal(theoretical, 150.0);
//! assert_eq!(signal.classification, Classification::LongModerate);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod signals;
pub mod structural;

pub use signals::ThresholdError;
pub use structural::ModelParamsError;
