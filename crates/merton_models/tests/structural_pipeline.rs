//! End-to-end tests for the structural model: solve, metrics, signal.
//!
//! # Test Categories
//!
//! 1. **Reference firms**: safe large-cap and distressed small-cap
//! 2. **Solver properties**: totality, determinism, residual acceptance
//! 3. **Signal boundaries**: strict threshold comparisons

use merton_core::types::MarketInputs;
use merton_models::signals::{Classification, CreditRating, SignalThresholds};
use merton_models::structural::{
    MertonSolver, MertonSystem, SolverMethod, StructuralModel, OPTIMIZER_ACCEPTANCE,
    ROOT_TOLERANCE,
};
use proptest::prelude::*;

// ============================================================================
// Reference Firms
// ============================================================================

#[test]
fn test_safe_large_cap() {
    let inputs = MarketInputs::new(3e12, 0.25, 1e11, 0.045, 1.0).unwrap();
    let eval = StructuralModel::default().evaluate(&inputs);

    assert!(eval.solution.asset_value > inputs.equity_value());
    assert!(eval.metrics.distance_to_default.unwrap() > 5.0);
    assert!(eval.metrics.credit_spread_bps.unwrap() < 50.0);
    assert_eq!(CreditRating::from_leverage(eval.leverage.unwrap()), CreditRating::AA);
}

#[test]
fn test_distressed_small_cap() {
    let inputs = MarketInputs::new(5e8, 0.95, 8e9, 0.045, 1.0).unwrap();
    let eval = StructuralModel::default().evaluate(&inputs);

    assert!(eval.solution.asset_value > 0.0);
    assert!(eval.metrics.distance_to_default.unwrap() < 2.0);
    assert!(eval.metrics.credit_spread_bps.unwrap() > 500.0);
    assert_eq!(CreditRating::from_leverage(eval.leverage.unwrap()), CreditRating::CCC);
}

#[test]
fn test_safe_firm_reads_as_long_against_wide_market() {
    let inputs = MarketInputs::new(3e12, 0.25, 1e11, 0.045, 1.0).unwrap();
    let eval = StructuralModel::default().evaluate(&inputs);

    let signal = SignalThresholds::default().signal(eval.metrics.credit_spread_bps.unwrap(), 400.0);
    assert_eq!(signal.classification, Classification::LongStrong);
    assert!(signal.strength.value() >= 4);
}

#[test]
fn test_higher_equity_vol_widens_spread() {
    let model = StructuralModel::default();
    let low = MarketInputs::new(100.0, 0.28, 80.0, 0.05, 1.0).unwrap();
    let high = MarketInputs::new(100.0, 0.52, 80.0, 0.05, 1.0).unwrap();

    let low_spread = model.evaluate(&low).metrics.credit_spread_bps.unwrap();
    let high_spread = model.evaluate(&high).metrics.credit_spread_bps.unwrap();
    assert!(high_spread >= low_spread);
}

// ============================================================================
// Signal Boundaries
// ============================================================================

#[test]
fn test_strong_threshold_boundary() {
    let t = SignalThresholds::default();
    assert_eq!(t.classify(150.0), Classification::ShortModerate);
    assert_eq!(t.classify(150.0001), Classification::ShortStrong);
    assert_eq!(t.classify(-150.0), Classification::LongModerate);
    assert_eq!(t.classify(-150.0001), Classification::LongStrong);
}

// ============================================================================
// Solver Properties
// ============================================================================

fn valid_inputs() -> impl Strategy<Value = MarketInputs> {
    (
        1e6f64..1e12,
        0.05f64..2.0,
        1e5f64..1e12,
        -0.01f64..0.10,
        0.25f64..5.0,
    )
        .prop_map(|(e, vol, d, r, t)| MarketInputs::new(e, vol, d, r, t).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solve_is_total(inputs in valid_inputs()) {
        let result = MertonSolver::new().solve(&inputs);
        prop_assert!(result.asset_value.is_finite() && result.asset_value > 0.0);
        prop_assert!(result.asset_vol.is_finite() && result.asset_vol > 0.0);
        prop_assert_ne!(result.method, SolverMethod::Failed);
    }

    #[test]
    fn solve_is_deterministic(inputs in valid_inputs()) {
        let solver = MertonSolver::new();
        prop_assert_eq!(solver.solve(&inputs), solver.solve(&inputs));
    }

    #[test]
    fn converged_methods_meet_acceptance(inputs in valid_inputs()) {
        let result = MertonSolver::new().solve(&inputs);
        let system = MertonSystem::from_inputs(&inputs);
        let [res_e, res_vol] = system.residuals(result.asset_value, result.asset_vol);
        match result.method {
            SolverMethod::RootFind => {
                prop_assert!(res_e.abs() < ROOT_TOLERANCE);
                prop_assert!(res_vol.abs() < ROOT_TOLERANCE);
            }
            SolverMethod::BoundedOptimize => {
                prop_assert!(res_e * res_e + res_vol * res_vol < OPTIMIZER_ACCEPTANCE);
            }
            _ => {}
        }
    }

    #[test]
    fn metrics_stay_in_range(inputs in valid_inputs()) {
        let eval = StructuralModel::default().evaluate(&inputs);
        if let Some(pd) = eval.metrics.default_probability {
            prop_assert!((0.0..=1.0).contains(&pd));
        }
        if let Some(spread) = eval.metrics.credit_spread_bps {
            prop_assert!((0.0..=10_000.0).contains(&spread));
        }
    }
}
