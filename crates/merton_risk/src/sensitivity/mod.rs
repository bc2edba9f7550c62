//! Sensitivity and stress analysis.
//!
//! - [`ShockGrid`]: relative shocks applied to one input
//! - [`SensitivityEngine`]: volatility and debt grids, stress scenarios,
//!   robustness check and the combined [`SensitivityReport`]
//! - [`StressScenario`]: preset combined volatility/debt shocks
//! - [`RobustnessCheck`]: signal flip detection and spread dispersion

mod engine;
mod grid;
mod presets;
mod report;
mod robustness;

pub use engine::{SensitivityEngine, SensitivityRow, StressOutcome};
pub use grid::{GridError, ShockDimension, ShockGrid, DEFAULT_ROBUSTNESS_SHOCKS, DEFAULT_SHOCKS};
pub use presets::StressScenario;
pub use report::SensitivityReport;
pub use robustness::{RobustnessCheck, SignalFlip};
