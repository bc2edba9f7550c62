//! Merton residual equations.
//!
//! Equity is a European call on firm assets struck at the debt face value.
//! Given candidate asset value `V` and asset volatility `σV`, the two
//! residuals measure how far the model is from the observed equity value
//! and equity volatility:
//!
//! ```text
//! d₁ = (ln(V/D) + (r + σV²/2)T) / (σV√T)
//! d₂ = d₁ − σV√T
//!
//! residual_E    = V·Φ(d₁) − D·e^(−rT)·Φ(d₂) − E
//! residual_volE = (V/E)·Φ(d₁)·σV − σE
//! ```
//!
//! Evaluation is total. Infeasible candidates (`V ≤ 0`, `σV ≤ 0`, `E ≤ 0`)
//! and any non-finite intermediate produce a large, finite sentinel pair so
//! that solvers treat the point as very far from a solution.

use merton_core::math::distributions::norm_cdf;
use merton_core::types::MarketInputs;

/// Absolute floor of the sentinel residual.
const SENTINEL_FLOOR: f64 = 1e10;

/// Multiple of `|E| + |D|` used to scale the sentinel for very large firms.
const SENTINEL_SCALE: f64 = 1e4;

/// The two-equation Merton system for one set of observed quantities.
///
/// Construction does not validate; [`residuals`](Self::residuals) handles
/// every input without panicking.
///
/// # Examples
/// ```
/// use merton_core::types::MarketInputs;
/// use merton_models::structural::MertonSystem;
///
/// let inputs = MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap();
/// let system = MertonSystem::from_inputs(&inputs);
///
/// let [res_e, res_vol] = system.residuals(175.0, 0.23);
/// assert!(res_e.is_finite() && res_vol.is_finite());
///
/// // Negative asset value is infeasible
/// let [s, _] = system.residuals(-1.0, 0.23);
/// assert_eq!(s, system.sentinel());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MertonSystem {
    equity_value: f64,
    equity_vol: f64,
    debt_face: f64,
    risk_free_rate: f64,
    horizon: f64,
}

impl MertonSystem {
    /// Build the system from raw observed quantities.
    pub fn new(
        equity_value: f64,
        equity_vol: f64,
        debt_face: f64,
        risk_free_rate: f64,
        horizon: f64,
    ) -> Self {
        Self {
            equity_value,
            equity_vol,
            debt_face,
            risk_free_rate,
            horizon,
        }
    }

    /// Build the system from validated market inputs.
    pub fn from_inputs(inputs: &MarketInputs) -> Self {
        Self::new(
            inputs.equity_value(),
            inputs.equity_vol(),
            inputs.debt_face(),
            inputs.risk_free_rate(),
            inputs.horizon(),
        )
    }

    /// Sentinel residual returned for infeasible candidates.
    ///
    /// `max(1e10, 1e4·(|E| + |D|))`, capped at `f64::MAX`.
    pub fn sentinel(&self) -> f64 {
        let scaled = SENTINEL_SCALE * (self.equity_value.abs() + self.debt_face.abs());
        SENTINEL_FLOOR.max(scaled).min(f64::MAX)
    }

    /// Residual pair `[residual_E, residual_volE]` at candidate `(V, σV)`.
    pub fn residuals(&self, asset_value: f64, asset_vol: f64) -> [f64; 2] {
        let sentinel = [self.sentinel(); 2];

        if !(asset_value > 0.0 && asset_vol > 0.0 && self.equity_value > 0.0) {
            return sentinel;
        }

        let Some((d1, d2)) = self.d1_d2(asset_value, asset_vol) else {
            return sentinel;
        };

        let nd1 = norm_cdf(d1);
        let nd2 = norm_cdf(d2);
        let discount = (-self.risk_free_rate * self.horizon).exp();

        let res_equity = asset_value * nd1 - self.debt_face * discount * nd2 - self.equity_value;
        let res_vol = (asset_value / self.equity_value) * nd1 * asset_vol - self.equity_vol;

        if res_equity.is_finite() && res_vol.is_finite() {
            [res_equity, res_vol]
        } else {
            sentinel
        }
    }

    /// Sum of squared residuals at `(V, σV)`.
    pub fn sum_of_squares(&self, asset_value: f64, asset_vol: f64) -> f64 {
        let [a, b] = self.residuals(asset_value, asset_vol);
        a * a + b * b
    }

    /// `(d₁, d₂)` at `(V, σV)`, or `None` when either is non-finite.
    pub fn d1_d2(&self, asset_value: f64, asset_vol: f64) -> Option<(f64, f64)> {
        let vol_sqrt_t = asset_vol * self.horizon.sqrt();
        let d1 = ((asset_value / self.debt_face).ln()
            + (self.risk_free_rate + 0.5 * asset_vol * asset_vol) * self.horizon)
            / vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;

        (d1.is_finite() && d2.is_finite()).then_some((d1, d2))
    }

    /// Observed equity value E.
    pub fn equity_value(&self) -> f64 {
        self.equity_value
    }

    /// Observed equity volatility σE.
    pub fn equity_vol(&self) -> f64 {
        self.equity_vol
    }

    /// Debt face value D.
    pub fn debt_face(&self) -> f64 {
        self.debt_face
    }
}
