//! Trading signals from theoretical vs. market credit spreads.
//!
//! - [`SignalThresholds`]: five-way classification of the spread difference
//! - [`SignalStrength`]: ordinal 0–5 strength rating
//! - [`CreditRating`]: rating bucket from model leverage, used to choose the
//!   market benchmark spread

mod classifier;
mod rating;

pub use classifier::{
    Classification, Signal, SignalStrength, SignalThresholds, ThresholdError,
    DEFAULT_MODERATE_BPS, DEFAULT_STRONG_BPS, STRENGTH_BREAKPOINTS_BPS,
};
pub use rating::CreditRating;
