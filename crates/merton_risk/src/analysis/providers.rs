//! Upstream data collaborators.
//!
//! The engine never fetches anything itself: equity observations and market
//! spreads come from implementations of the traits below. Both traits are
//! `Send + Sync` so a single provider can serve a parallel batch.

use std::collections::BTreeMap;

use merton_core::types::{InputError, MarketInputs};
use merton_models::signals::CreditRating;
use thiserror::Error;
use tracing::warn;

/// Spread used when neither the requested rating nor BBB is available.
pub const DEFAULT_FALLBACK_SPREAD_BPS: f64 = 200.0;

/// Failure reported by an upstream provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The identifier is unknown to the provider.
    #[error("Identifier not found: {0}")]
    NotFound(String),

    /// The provider could not be reached or refused the request.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with unusable data.
    #[error("Malformed upstream data: {0}")]
    Malformed(String),
}

/// Equity-side observation for one firm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquitySnapshot {
    /// Ticker or other identifier
    pub identifier: String,
    /// Market capitalisation E
    pub equity_value: f64,
    /// Annualised equity volatility σE
    pub equity_vol: f64,
    /// Face value of debt D
    pub debt_face: f64,
    /// Free-form descriptive fields (name, sector, volatility source, ...)
    pub metadata: BTreeMap<String, String>,
}

impl EquitySnapshot {
    /// Snapshot without metadata.
    pub fn new(
        identifier: impl Into<String>,
        equity_value: f64,
        equity_vol: f64,
        debt_face: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            equity_value,
            equity_vol,
            debt_face,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Validated model inputs at the given rate and horizon.
    pub fn to_inputs(&self, risk_free_rate: f64, horizon: f64) -> Result<MarketInputs, InputError> {
        MarketInputs::new(
            self.equity_value,
            self.equity_vol,
            self.debt_face,
            risk_free_rate,
            horizon,
        )
    }
}

/// Source of equity observations.
pub trait EquityDataProvider: Send + Sync {
    /// Fetch the latest snapshot for `identifier`.
    fn fetch(&self, identifier: &str) -> Result<EquitySnapshot, UpstreamError>;
}

/// Source of market credit spreads by rating bucket.
pub trait MarketSpreadProvider: Send + Sync {
    /// Market spread in bps for `rating`.
    fn spread_bps(&self, rating: CreditRating) -> Result<f64, UpstreamError>;
}

/// Static rating → spread table.
///
/// Ratings missing from the table fall back to the BBB entry, then to
/// [`DEFAULT_FALLBACK_SPREAD_BPS`].
///
/// # Examples
/// ```
/// use merton_models::signals::CreditRating;
/// use merton_risk::analysis::{MarketSpreadProvider, RatingSpreadTable};
///
/// let table = RatingSpreadTable::new()
///     .with_spread(CreditRating::BBB, 130.0)
///     .with_spread(CreditRating::B, 380.0);
///
/// assert_eq!(table.spread_bps(CreditRating::B).unwrap(), 380.0);
/// assert_eq!(table.spread_bps(CreditRating::CCC).unwrap(), 130.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSpreadTable {
    spreads: BTreeMap<CreditRating, f64>,
}

impl RatingSpreadTable {
    /// Empty table; every lookup returns the default fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spread for one rating.
    pub fn with_spread(mut self, rating: CreditRating, spread_bps: f64) -> Self {
        self.spreads.insert(rating, spread_bps);
        self
    }

    /// Spread for `rating` if present.
    pub fn get(&self, rating: CreditRating) -> Option<f64> {
        self.spreads.get(&rating).copied()
    }
}

impl FromIterator<(CreditRating, f64)> for RatingSpreadTable {
    fn from_iter<I: IntoIterator<Item = (CreditRating, f64)>>(iter: I) -> Self {
        Self {
            spreads: iter.into_iter().collect(),
        }
    }
}

impl MarketSpreadProvider for RatingSpreadTable {
    fn spread_bps(&self, rating: CreditRating) -> Result<f64, UpstreamError> {
        if let Some(spread) = self.get(rating) {
            return Ok(spread);
        }
        let fallback = self
            .get(CreditRating::BBB)
            .unwrap_or(DEFAULT_FALLBACK_SPREAD_BPS);
        warn!("Rating {} spread unavailable, using BBB: {} bps", rating, fallback);
        Ok(fallback)
    }
}
