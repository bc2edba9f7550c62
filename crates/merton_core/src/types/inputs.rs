//! Validated market inputs for the structural model.

use super::error::InputError;

/// Observable inputs for one structural-model analysis.
///
/// | Symbol | Accessor             | Constraint      |
/// |--------|----------------------|-----------------|
/// | E      | `equity_value()`     | > 0, finite     |
/// | σE     | `equity_vol()`       | > 0, finite     |
/// | D      | `debt_face()`        | > 0, finite     |
/// | r      | `risk_free_rate()`   | finite          |
/// | T      | `horizon()`          | > 0, finite     |
///
/// The record is `Copy` and immutable: it is validated once on construction
/// and passed by value into every downstream function. Perturbed copies for
/// sensitivity analysis are built with [`with_equity_vol`](Self::with_equity_vol)
/// and [`with_debt_face`](Self::with_debt_face), which re-validate.
///
/// # Examples
/// ```
/// use merton_core::types::MarketInputs;
///
/// let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
/// assert_eq!(inputs.equity_value(), 100.0);
///
/// // Non-positive debt is rejected before any solve is attempted
/// assert!(MarketInputs::new(100.0, 0.40, 0.0, 0.05, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketInputs {
    equity_value: f64,
    equity_vol: f64,
    debt_face: f64,
    risk_free_rate: f64,
    horizon: f64,
}

impl MarketInputs {
    /// Creates validated market inputs.
    ///
    /// # Arguments
    /// * `equity_value` - Market capitalisation E
    /// * `equity_vol` - Annualised equity volatility σE (decimal)
    /// * `debt_face` - Face value of debt D (default barrier)
    /// * `risk_free_rate` - Continuously compounded risk-free rate r
    /// * `horizon` - Horizon T in years
    ///
    /// # Errors
    /// - `InputError::NonFinite` if any argument is NaN or infinite
    /// - `InputError::NonPositive` if E, σE, D or T is not strictly positive
    /// - `InputError::NonFinite` on `enterprise_value` if E + D overflows
    pub fn new(
        equity_value: f64,
        equity_vol: f64,
        debt_face: f64,
        risk_free_rate: f64,
        horizon: f64,
    ) -> Result<Self, InputError> {
        positive("equity_value", equity_value)?;
        positive("equity_vol", equity_vol)?;
        positive("debt_face", debt_face)?;
        finite("risk_free_rate", risk_free_rate)?;
        positive("horizon", horizon)?;
        finite("enterprise_value", equity_value + debt_face)?;

        Ok(Self {
            equity_value,
            equity_vol,
            debt_face,
            risk_free_rate,
            horizon,
        })
    }

    /// Market value of equity E.
    #[inline]
    pub fn equity_value(&self) -> f64 {
        self.equity_value
    }

    /// Annualised equity volatility σE.
    #[inline]
    pub fn equity_vol(&self) -> f64 {
        self.equity_vol
    }

    /// Face value of debt D.
    #[inline]
    pub fn debt_face(&self) -> f64 {
        self.debt_face
    }

    /// Risk-free rate r.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Horizon T in years.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Book-value proxy for the firm, E + D.
    #[inline]
    pub fn enterprise_value(&self) -> f64 {
        self.equity_value + self.debt_face
    }

    /// Returns a copy with equity volatility replaced.
    ///
    /// # Errors
    /// Fails with the same validation as [`new`](Self::new).
    pub fn with_equity_vol(&self, equity_vol: f64) -> Result<Self, InputError> {
        Self::new(
            self.equity_value,
            equity_vol,
            self.debt_face,
            self.risk_free_rate,
            self.horizon,
        )
    }

    /// Returns a copy with the debt face value replaced.
    ///
    /// # Errors
    /// Fails with the same validation as [`new`](Self::new).
    pub fn with_debt_face(&self, debt_face: f64) -> Result<Self, InputError> {
        Self::new(
            self.equity_value,
            self.equity_vol,
            debt_face,
            self.risk_free_rate,
            self.horizon,
        )
    }
}

fn finite(field: &str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

fn positive(field: &str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(InputError::NonPositive {
            field: field.to_string(),
            value,
        })
    }
}
