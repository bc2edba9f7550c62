//! End-to-end signal analysis.
//!
//! Wires upstream providers to the structural model and classifier:
//!
//! - [`EquityDataProvider`], [`MarketSpreadProvider`]: upstream seams
//! - [`SignalAnalyzer`]: single-firm and parallel batch analysis
//! - [`BatchOutcome`]: ranked results with per-firm failures
//! - [`AnalysisSettings`]: validated settings from `infra_config`

mod analyzer;
mod batch;
mod providers;
mod settings;

pub use analyzer::{AnalysisError, AnalysisResult, SignalAnalyzer};
pub use batch::{BatchFailure, BatchOutcome, SignalSide};
pub use providers::{
    EquityDataProvider, EquitySnapshot, MarketSpreadProvider, RatingSpreadTable, UpstreamError,
    DEFAULT_FALLBACK_SPREAD_BPS,
};
pub use settings::{AnalysisSettings, SettingsError, DEFAULT_MAX_FAILURE_RATE};
