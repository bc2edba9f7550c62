//! # merton_risk (L3: Application)
//!
//! Sensitivity analysis, stress testing and batch signal generation on top
//! of the Merton structural model.
//!
//! This crate provides:
//! - Volatility and debt shock grids with per-point failure isolation
//! - Preset combined stress scenarios
//! - Signal robustness checks under volatility shocks
//! - Provider-driven single-firm and parallel batch analysis
//! - Rayon-based parallelisation utilities
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            merton_risk (L3)             │
//! ├─────────────────────────────────────────┤
//! │  sensitivity/ - grids, stress presets,  │
//! │                 robustness, report      │
//! │  analysis/    - providers, analyzer,    │
//! │                 batch ranking, settings │
//! │  parallel     - Rayon utilities         │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           merton_models (L2)            │
//! │  Solver, risk metrics, classifier       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use merton_core::types::MarketInputs;
//! use merton_risk::sensitivity::{SensitivityEngine, StressScenario};
//!
//! let base = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
//! let report = SensitivityEngine::new(base).generate_report(150.0);
//!
//! let benign = report.stress_outcome(StressScenario::Benign).unwrap();
//! let severe = report.stress_outcome(StressScenario::Severe).unwrap();
//! assert!(
//!     severe.metrics.credit_spread_bps.unwrap() > benign.metrics.credit_spread_bps.unwrap()
//! );
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analysis;
pub mod parallel;
pub mod sensitivity;

pub use analysis::{AnalysisError, SettingsError, UpstreamError};
pub use sensitivity::GridError;
