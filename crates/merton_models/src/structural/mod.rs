//! Merton structural credit model.
//!
//! Equity is treated as a European call on firm assets with strike equal to
//! the face value of debt. This module infers the unobservable asset value
//! and asset volatility from observed equity quantities and turns them into
//! credit risk metrics:
//!
//! - [`MertonSystem`]: the two-equation residual system
//! - [`MertonSolver`]: multi-strategy solver with closed-form fallback
//! - [`RiskMetrics`]: distance to default, default probability, credit spread
//! - [`StructuralModel`]: solve + metrics in one call

mod metrics;
mod model;
mod residuals;
mod solver;

pub use metrics::{
    credit_spread_bps, default_probability, distance_to_default, leverage,
    spread_from_default_probability, ModelParams, ModelParamsError, RiskMetrics,
    DEFAULT_RECOVERY_RATE, MAX_SPREAD_BPS,
};
pub use model::{Evaluation, StructuralModel};
pub use residuals::MertonSystem;
pub use solver::{
    bounded_optimize, fallback_approximation, root_find, GuessRegime, MertonSolver,
    SearchBounds, SolverMethod, SolverResult, Strategy, OPTIMIZER_ACCEPTANCE, ROOT_TOLERANCE,
};
