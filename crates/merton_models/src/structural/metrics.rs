//! Credit risk metrics derived from implied asset value and volatility.
//!
//! - Distance to default: `DD = [ln(V/D) + (r − σV²/2)T] / (σV√T)`
//! - Default probability: `PD = Φ(−DD)`
//! - Credit spread (bps): `−ln(1 − PD·LGD) / T · 10⁴`, `LGD = 1 − recovery`
//!
//! Every metric is `Option<f64>`: `None` marks an undefined value
//! (degenerate inputs or a non-finite result) and propagates downstream.

use merton_core::math::distributions::norm_sf;
use merton_core::types::MarketInputs;
use thiserror::Error;

use super::solver::SolverResult;

/// Upper cap on the credit spread, in basis points.
pub const MAX_SPREAD_BPS: f64 = 10_000.0;

/// Default recovery rate on defaulted debt.
pub const DEFAULT_RECOVERY_RATE: f64 = 0.40;

const BPS: f64 = 10_000.0;

/// Invalid model parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelParamsError {
    /// Recovery rate outside `[0, 1]` or non-finite.
    #[error("Invalid recovery rate: {0} (must be within [0, 1])")]
    InvalidRecoveryRate(f64),
}

/// Parameters of the metric calculation that are not market observables.
///
/// # Examples
/// ```
/// use merton_models::structural::ModelParams;
///
/// let params = ModelParams::default();
/// assert_eq!(params.recovery_rate(), 0.40);
/// assert!((params.loss_given_default() - 0.60).abs() < 1e-12);
///
/// assert!(ModelParams::new(1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelParams {
    recovery_rate: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            recovery_rate: DEFAULT_RECOVERY_RATE,
        }
    }
}

impl ModelParams {
    /// Creates model parameters with the given recovery rate.
    ///
    /// # Errors
    /// `ModelParamsError::InvalidRecoveryRate` unless `0 ≤ recovery_rate ≤ 1`.
    pub fn new(recovery_rate: f64) -> Result<Self, ModelParamsError> {
        if !(0.0..=1.0).contains(&recovery_rate) {
            return Err(ModelParamsError::InvalidRecoveryRate(recovery_rate));
        }
        Ok(Self { recovery_rate })
    }

    /// Recovery rate on defaulted debt.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Loss given default, `1 − recovery_rate`.
    #[inline]
    pub fn loss_given_default(&self) -> f64 {
        1.0 - self.recovery_rate
    }
}

/// Distance to default.
///
/// `None` if `V ≤ 0`, `σV ≤ 0`, `D ≤ 0`, `T ≤ 0`, or the result is non-finite.
///
/// # Examples
/// ```
/// use merton_models::structural::distance_to_default;
///
/// let dd = distance_to_default(150.0, 0.2, 100.0, 0.05, 1.0).unwrap();
/// assert!(dd > 2.0);
/// assert!(distance_to_default(150.0, 0.0, 100.0, 0.05, 1.0).is_none());
/// ```
pub fn distance_to_default(
    asset_value: f64,
    asset_vol: f64,
    debt_face: f64,
    risk_free_rate: f64,
    horizon: f64,
) -> Option<f64> {
    if !(asset_value > 0.0 && asset_vol > 0.0 && debt_face > 0.0 && horizon > 0.0) {
        return None;
    }

    let denominator = asset_vol * horizon.sqrt();
    if denominator == 0.0 {
        return None;
    }

    let dd = ((asset_value / debt_face).ln()
        + (risk_free_rate - 0.5 * asset_vol * asset_vol) * horizon)
        / denominator;
    dd.is_finite().then_some(dd)
}

/// Default probability `Φ(−DD)` over the horizon; `None` when DD is undefined.
pub fn default_probability(
    asset_value: f64,
    asset_vol: f64,
    debt_face: f64,
    risk_free_rate: f64,
    horizon: f64,
) -> Option<f64> {
    distance_to_default(asset_value, asset_vol, debt_face, risk_free_rate, horizon).map(norm_sf)
}

/// Credit spread in basis points implied by a default probability.
///
/// `survival = 1 − PD·LGD`; a non-positive survival maps to the
/// [`MAX_SPREAD_BPS`] cap and a survival of one or more maps to zero.
/// Otherwise `−ln(survival)/T · 10⁴`, clamped to `[0, 10000]`.
pub fn spread_from_default_probability(
    default_probability: f64,
    horizon: f64,
    loss_given_default: f64,
) -> Option<f64> {
    if default_probability.is_nan() || !(horizon > 0.0) {
        return None;
    }

    let survival = 1.0 - default_probability * loss_given_default;
    if survival <= 0.0 {
        return Some(MAX_SPREAD_BPS);
    }
    if survival >= 1.0 {
        return Some(0.0);
    }

    let spread = -survival.ln() / horizon * BPS;
    spread.is_finite().then(|| spread.clamp(0.0, MAX_SPREAD_BPS))
}

/// Theoretical credit spread in basis points; `None` when DD is undefined.
///
/// # Examples
/// ```
/// use merton_models::structural::credit_spread_bps;
///
/// // Safe firm: negligible spread
/// let safe = credit_spread_bps(300.0, 0.15, 50.0, 0.04, 1.0, 0.40).unwrap();
/// assert!(safe < 1.0);
///
/// // Firm barely above its debt: wide spread
/// let risky = credit_spread_bps(105.0, 0.45, 100.0, 0.04, 1.0, 0.40).unwrap();
/// assert!(risky > 1_000.0);
/// ```
pub fn credit_spread_bps(
    asset_value: f64,
    asset_vol: f64,
    debt_face: f64,
    risk_free_rate: f64,
    horizon: f64,
    recovery_rate: f64,
) -> Option<f64> {
    let pd = default_probability(asset_value, asset_vol, debt_face, risk_free_rate, horizon)?;
    spread_from_default_probability(pd, horizon, 1.0 - recovery_rate)
}

/// Model leverage `D / V`; `None` when `V ≤ 0` or the ratio is non-finite.
pub fn leverage(debt_face: f64, asset_value: f64) -> Option<f64> {
    if !(asset_value > 0.0) {
        return None;
    }
    let ratio = debt_face / asset_value;
    ratio.is_finite().then_some(ratio)
}

/// Risk metrics for one solved firm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskMetrics {
    /// Distance to default (standard deviations).
    pub distance_to_default: Option<f64>,
    /// Default probability over the horizon, in `[0, 1]`.
    pub default_probability: Option<f64>,
    /// Theoretical credit spread in bps, in `[0, 10000]`.
    pub credit_spread_bps: Option<f64>,
}

impl RiskMetrics {
    /// All metrics undefined.
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Metrics for a solved `(V, σV)` against the observed debt, rate and horizon.
    pub fn from_solution(
        solution: &SolverResult,
        inputs: &MarketInputs,
        params: &ModelParams,
    ) -> Self {
        let dd = distance_to_default(
            solution.asset_value,
            solution.asset_vol,
            inputs.debt_face(),
            inputs.risk_free_rate(),
            inputs.horizon(),
        );
        let pd = dd.map(norm_sf);
        let spread = pd.and_then(|p| {
            spread_from_default_probability(p, inputs.horizon(), params.loss_given_default())
        });

        Self {
            distance_to_default: dd,
            default_probability: pd,
            credit_spread_bps: spread,
        }
    }

    /// Whether every metric is defined.
    pub fn is_defined(&self) -> bool {
        self.distance_to_default.is_some()
            && self.default_probability.is_some()
            && self.credit_spread_bps.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::SolverMethod;
    use approx::assert_relative_eq;
    use merton_core::math::distributions::norm_cdf;

    #[test]
    fn test_distance_to_default_formula() {
        let dd = distance_to_default(150.0, 0.2, 100.0, 0.05, 1.0).unwrap();
        let expected = ((1.5_f64).ln() + (0.05 - 0.02)) / 0.2;
        assert_relative_eq!(dd, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_to_default_undefined_cases() {
        assert!(distance_to_default(0.0, 0.2, 100.0, 0.05, 1.0).is_none());
        assert!(distance_to_default(150.0, -0.2, 100.0, 0.05, 1.0).is_none());
        assert!(distance_to_default(150.0, 0.2, 0.0, 0.05, 1.0).is_none());
        assert!(distance_to_default(150.0, 0.2, 100.0, 0.05, 0.0).is_none());
        assert!(distance_to_default(f64::NAN, 0.2, 100.0, 0.05, 1.0).is_none());
        assert!(distance_to_default(f64::INFINITY, 0.2, 100.0, 0.05, 1.0).is_none());
    }

    #[test]
    fn test_default_probability_is_tail_of_dd() {
        let dd = distance_to_default(150.0, 0.2, 100.0, 0.05, 1.0).unwrap();
        let pd = default_probability(150.0, 0.2, 100.0, 0.05, 1.0).unwrap();
        assert_relative_eq!(pd, norm_cdf(-dd), epsilon = 1e-15);
        assert!(default_probability(150.0, 0.2, 100.0, 0.05, -1.0).is_none());
    }

    #[test]
    fn test_spread_boundaries() {
        // Certain default with zero recovery: survival 0 hits the cap
        assert_eq!(spread_from_default_probability(1.0, 1.0, 1.0), Some(MAX_SPREAD_BPS));
        // No default risk
        assert_eq!(spread_from_default_probability(0.0, 1.0, 0.6), Some(0.0));
        // Full recovery means no loss
        assert_eq!(spread_from_default_probability(0.3, 1.0, 0.0), Some(0.0));
        assert!(spread_from_default_probability(f64::NAN, 1.0, 0.6).is_none());
    }

    #[test]
    fn test_spread_formula() {
        let spread = spread_from_default_probability(0.05, 2.0, 0.6).unwrap();
        let expected = -(1.0 - 0.03_f64).ln() / 2.0 * 10_000.0;
        assert_relative_eq!(spread, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_spread_is_capped() {
        // PD = 0.9999, LGD = 1, very short horizon
        let spread = spread_from_default_probability(0.9999, 0.01, 1.0).unwrap();
        assert_eq!(spread, MAX_SPREAD_BPS);
    }

    #[test]
    fn test_model_params_validation() {
        assert!(ModelParams::new(0.0).is_ok());
        assert!(ModelParams::new(1.0).is_ok());
        assert_eq!(
            ModelParams::new(-0.1),
            Err(ModelParamsError::InvalidRecoveryRate(-0.1))
        );
        assert!(ModelParams::new(f64::NAN).is_err());
    }

    #[test]
    fn test_leverage() {
        assert_eq!(leverage(50.0, 200.0), Some(0.25));
        assert!(leverage(50.0, 0.0).is_none());
    }

    #[test]
    fn test_from_solution_matches_free_functions() {
        let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
        let solution = SolverResult {
            asset_value: 176.0,
            asset_vol: 0.23,
            method: SolverMethod::RootFind,
        };
        let metrics = RiskMetrics::from_solution(&solution, &inputs, &ModelParams::default());

        assert!(metrics.is_defined());
        assert_eq!(
            metrics.distance_to_default,
            distance_to_default(176.0, 0.23, 80.0, 0.05, 1.0)
        );
        assert_eq!(
            metrics.credit_spread_bps,
            credit_spread_bps(176.0, 0.23, 80.0, 0.05, 1.0, 0.40)
        );
    }

    #[test]
    fn test_undefined_metrics() {
        let metrics = RiskMetrics::undefined();
        assert!(!metrics.is_defined());
        assert!(metrics.credit_spread_bps.is_none());
    }
}
