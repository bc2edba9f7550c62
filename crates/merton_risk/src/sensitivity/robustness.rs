//! Signal robustness under equity volatility shocks.
//!
//! A signal is robust when no nonzero volatility shock moves it to a
//! different non-neutral classification. Moving into or out of `Neutral`
//! is not a flip.

use merton_models::signals::{Classification, SignalThresholds};

use super::engine::SensitivityRow;

/// A shock under which the classification changed to another non-neutral class.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalFlip {
    /// Shock in percent (`20.0` = +20%)
    pub shock_pct: f64,
    /// Base classification
    pub from: Classification,
    /// Classification under the shock
    pub to: Classification,
    /// Shocked theoretical minus market spread, in bps
    pub spread_diff_bps: f64,
}

/// Robustness verdict for one firm against one market spread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobustnessCheck {
    /// `true` iff `signal_flips` is empty
    pub is_robust: bool,
    /// Classification of the unshocked spread
    pub base_classification: Classification,
    /// Unshocked theoretical minus market spread, in bps
    pub base_spread_diff_bps: Option<f64>,
    /// Flips in ascending shock order
    pub signal_flips: Vec<SignalFlip>,
    /// Sample standard deviation of the defined spreads across the grid
    pub spread_std_bps: Option<f64>,
    /// Max minus min of the defined spreads across the grid
    pub spread_range_bps: Option<f64>,
    /// Volatility rows the verdict was computed from
    pub rows: Vec<SensitivityRow>,
}

impl RobustnessCheck {
    /// Assess robustness from already-evaluated volatility rows.
    ///
    /// `base_spread_bps` is the unshocked theoretical spread. Rows with a
    /// zero shock are ignored for flip detection but contribute to the
    /// dispersion statistics. Rows with an undefined spread classify as
    /// `Neutral` and are left out of the dispersion statistics.
    pub fn assess(
        base_spread_bps: Option<f64>,
        rows: Vec<SensitivityRow>,
        market_spread_bps: f64,
        thresholds: &SignalThresholds,
    ) -> Self {
        let base_diff = base_spread_bps.map(|s| s - market_spread_bps);
        let base_classification = thresholds.classify(base_diff.unwrap_or(f64::NAN));

        let signal_flips: Vec<SignalFlip> = rows
            .iter()
            .filter(|row| row.shock_pct != 0.0)
            .filter_map(|row| {
                let diff = row.metrics.credit_spread_bps? - market_spread_bps;
                let to = thresholds.classify(diff);
                (to != base_classification && to != Classification::Neutral).then_some(
                    SignalFlip {
                        shock_pct: row.shock_pct,
                        from: base_classification,
                        to,
                        spread_diff_bps: diff,
                    },
                )
            })
            .collect();

        let spreads: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.metrics.credit_spread_bps)
            .collect();

        Self {
            is_robust: signal_flips.is_empty(),
            base_classification,
            base_spread_diff_bps: base_diff,
            signal_flips,
            spread_std_bps: sample_std(&spreads),
            spread_range_bps: range(&spreads),
            rows,
        }
    }
}

/// Sample standard deviation (n − 1); `None` for fewer than two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1.0)).sqrt())
}

fn range(values: &[f64]) -> Option<f64> {
    let max = values.iter().copied().reduce(f64::max)?;
    let min = values.iter().copied().reduce(f64::min)?;
    Some(max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::ShockDimension;
    use approx::assert_relative_eq;
    use merton_models::structural::{RiskMetrics, SolverMethod, SolverResult};

    fn row(shock_pct: f64, spread: Option<f64>) -> SensitivityRow {
        SensitivityRow {
            dimension: ShockDimension::Volatility,
            shock_pct,
            shocked_value: 0.4 * (1.0 + shock_pct / 100.0),
            solution: Some(SolverResult {
                asset_value: 180.0,
                asset_vol: 0.2,
                method: SolverMethod::RootFind,
            }),
            metrics: RiskMetrics {
                distance_to_default: Some(2.0),
                default_probability: Some(0.02),
                credit_spread_bps: spread,
            },
            method: SolverMethod::RootFind,
            leverage: None,
            spread_change_bps: None,
        }
    }

    #[test]
    fn test_long_to_short_is_a_flip() {
        // market 200: -20% → diff -100 (LongModerate), +20% → diff +100 (ShortModerate)
        let rows = vec![
            row(-20.0, Some(100.0)),
            row(-10.0, Some(110.0)),
            row(0.0, Some(100.0)),
            row(10.0, Some(200.0)),
            row(20.0, Some(300.0)),
        ];
        let check = RobustnessCheck::assess(Some(100.0), rows, 200.0, &SignalThresholds::default());

        assert!(!check.is_robust);
        assert_eq!(check.base_classification, Classification::LongModerate);
        assert_eq!(check.base_spread_diff_bps, Some(-100.0));
        assert_eq!(check.signal_flips.len(), 1);
        let flip = check.signal_flips[0];
        assert_eq!(flip.shock_pct, 20.0);
        assert_eq!(flip.from, Classification::LongModerate);
        assert_eq!(flip.to, Classification::ShortModerate);
        assert_eq!(flip.spread_diff_bps, 100.0);
    }

    #[test]
    fn test_neutral_transitions_are_not_flips() {
        // Long at base, neutral under positive shocks
        let rows = vec![
            row(-20.0, Some(50.0)),
            row(0.0, Some(100.0)),
            row(20.0, Some(150.0)),
        ];
        let check = RobustnessCheck::assess(Some(100.0), rows, 200.0, &SignalThresholds::default());
        assert!(check.is_robust);
        assert!(check.signal_flips.is_empty());
    }

    #[test]
    fn test_dispersion_uses_sample_std() {
        let rows = vec![row(-10.0, Some(10.0)), row(0.0, Some(20.0)), row(10.0, Some(30.0))];
        let check = RobustnessCheck::assess(Some(20.0), rows, 20.0, &SignalThresholds::default());
        assert_relative_eq!(check.spread_std_bps.unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(check.spread_range_bps.unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_spreads_are_skipped() {
        let rows = vec![row(-10.0, None), row(0.0, Some(20.0)), row(10.0, Some(500.0))];
        let check = RobustnessCheck::assess(Some(20.0), rows, 20.0, &SignalThresholds::default());
        // Neutral base, +10% goes short
        assert!(!check.is_robust);
        assert_eq!(check.signal_flips[0].to, Classification::ShortStrong);
        assert_relative_eq!(check.spread_range_bps.unwrap(), 480.0);
        assert_eq!(check.rows.len(), 3);
    }

    #[test]
    fn test_undefined_base_is_neutral() {
        let check = RobustnessCheck::assess(
            None,
            vec![row(0.0, None)],
            100.0,
            &SignalThresholds::default(),
        );
        assert_eq!(check.base_classification, Classification::Neutral);
        assert_eq!(check.base_spread_diff_bps, None);
        assert_eq!(check.spread_std_bps, None);
        assert_eq!(check.spread_range_bps, None);
        assert!(check.is_robust);
    }

    #[test]
    fn test_sample_std_needs_two_values() {
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(range(&[5.0]), Some(0.0));
        assert_eq!(range(&[]), None);
    }
}
