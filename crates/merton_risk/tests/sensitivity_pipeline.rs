//! End-to-end tests for the sensitivity engine and batch analysis.

use std::collections::HashMap;

use merton_core::types::MarketInputs;
use merton_models::signals::{Classification, CreditRating};
use merton_models::structural::SolverMethod;
use merton_risk::analysis::{
    AnalysisError, AnalysisSettings, EquityDataProvider, EquitySnapshot, RatingSpreadTable,
    SignalAnalyzer, SignalSide, UpstreamError,
};
use merton_risk::sensitivity::{SensitivityEngine, ShockGrid, StressScenario};
use proptest::prelude::*;

fn moderate() -> MarketInputs {
    MarketInputs::new(100.0, 0.40, 80.0, 0.05, 1.0).unwrap()
}

// ============================================================
// Sensitivity grids
// ============================================================

#[test]
fn test_volatility_stress_is_monotone_at_the_ends() {
    let rows = SensitivityEngine::new(moderate()).volatility_sensitivity();
    let low = rows.first().unwrap().theo_spread_bps().unwrap();
    let high = rows.last().unwrap().theo_spread_bps().unwrap();

    assert_eq!(rows.first().unwrap().shock_pct, -30.0);
    assert_eq!(rows.last().unwrap().shock_pct, 30.0);
    assert!(high >= low, "spread(+30%) = {} < spread(-30%) = {}", high, low);
}

#[test]
fn test_debt_grid_spreads_increase() {
    let rows = SensitivityEngine::new(moderate()).debt_sensitivity();
    let spreads: Vec<f64> = rows.iter().map(|r| r.theo_spread_bps().unwrap()).collect();
    for pair in spreads.windows(2) {
        assert!(pair[1] >= pair[0], "debt spreads not increasing: {:?}", spreads);
    }
    let leverages: Vec<f64> = rows.iter().map(|r| r.leverage.unwrap()).collect();
    assert!(leverages.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_zero_shock_row_equals_direct_evaluation() {
    let engine = SensitivityEngine::new(moderate());
    let direct = engine.base_evaluation();
    let rows = engine.volatility_sensitivity();
    let zero = rows.iter().find(|r| r.shock_pct == 0.0).unwrap();

    assert_eq!(zero.solution, Some(direct.solution));
    assert_eq!(zero.metrics, direct.metrics);
    assert_eq!(zero.method, direct.solution.method);
}

#[test]
fn test_failed_point_does_not_abort_grid() {
    let engine = SensitivityEngine::new(moderate())
        .with_debt_grid(ShockGrid::new(vec![-1.5, -1.0, -0.5, 0.0, 0.5]).unwrap());
    let rows = engine.debt_sensitivity();

    assert_eq!(rows.len(), 5);
    let failed: Vec<f64> = rows
        .iter()
        .filter(|r| r.method == SolverMethod::Failed)
        .map(|r| r.shock_pct)
        .collect();
    assert_eq!(failed, vec![-150.0, -100.0]);
    assert!(rows[2..].iter().all(|r| r.metrics.is_defined()));
}

// ============================================================
// Stress scenarios
// ============================================================

#[test]
fn test_stress_ladder_is_ordered() {
    let engine = SensitivityEngine::new(moderate());
    let outcomes = engine.stress_test();
    let spread = |scenario: StressScenario| {
        outcomes
            .iter()
            .find(|o| o.scenario == scenario)
            .and_then(|o| o.metrics.credit_spread_bps)
            .unwrap()
    };

    assert!(spread(StressScenario::Benign) <= spread(StressScenario::Base));
    assert!(spread(StressScenario::Base) <= spread(StressScenario::Mild));
    assert!(spread(StressScenario::Mild) <= spread(StressScenario::Moderate));
    assert!(spread(StressScenario::Moderate) <= spread(StressScenario::Severe));
    assert!(spread(StressScenario::Severe) <= spread(StressScenario::Extreme));
}

// ============================================================
// Robustness
// ============================================================

#[test]
fn test_deep_long_signal_is_robust() {
    let engine = SensitivityEngine::new(moderate());

    let deep = engine.robustness_check(1_000.0);
    assert!(deep.is_robust);
    assert_eq!(deep.base_classification, Classification::LongStrong);

    let report = engine.generate_report(1_000.0);
    assert_eq!(report.robustness, deep);
}

#[test]
fn test_safe_company_report() {
    let safe = MarketInputs::new(3e12, 0.25, 1e11, 0.045, 1.0).unwrap();
    let report = SensitivityEngine::new(safe).generate_report(60.0);

    assert_eq!(report.failed_points(), 0);
    assert!(report.base.metrics.distance_to_default.unwrap() > 5.0);
    assert!(report
        .volatility
        .iter()
        .all(|r| r.theo_spread_bps().unwrap() < 50.0));
    assert!(report.robustness.is_robust);
}

// ============================================================
// Batch analysis
// ============================================================

struct StaticEquity(HashMap<String, EquitySnapshot>);

impl StaticEquity {
    fn new(snapshots: Vec<EquitySnapshot>) -> Self {
        Self(
            snapshots
                .into_iter()
                .map(|s| (s.identifier.clone(), s))
                .collect(),
        )
    }
}

impl EquityDataProvider for StaticEquity {
    fn fetch(&self, identifier: &str) -> Result<EquitySnapshot, UpstreamError> {
        match identifier {
            "TIMEOUT" => Err(UpstreamError::Unavailable("request timed out".to_string())),
            _ => self
                .0
                .get(identifier)
                .cloned()
                .ok_or_else(|| UpstreamError::NotFound(identifier.to_string())),
        }
    }
}

fn spread_table() -> RatingSpreadTable {
    [
        (CreditRating::AA, 60.0),
        (CreditRating::A, 90.0),
        (CreditRating::BBB, 150.0),
        (CreditRating::BB, 280.0),
        (CreditRating::B, 420.0),
        (CreditRating::CCC, 900.0),
    ]
    .into_iter()
    .collect()
}

fn analyzer() -> SignalAnalyzer<StaticEquity, RatingSpreadTable> {
    let equity = StaticEquity::new(vec![
        EquitySnapshot::new("MEGA", 3e12, 0.25, 1e11),
        EquitySnapshot::new("MID", 100.0, 0.40, 80.0),
        EquitySnapshot::new("DISTRESSED", 5e8, 0.95, 8e9),
        EquitySnapshot::new("BROKEN", 100.0, -0.40, 80.0),
    ]);
    SignalAnalyzer::new(equity, spread_table(), AnalysisSettings::default())
}

#[test]
fn test_batch_isolates_failures() {
    let ids = ["MEGA", "TIMEOUT", "MID", "BROKEN", "UNKNOWN", "DISTRESSED"];
    let outcome = analyzer().analyze_batch(&ids);

    assert_eq!(outcome.total(), 6);
    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.failures.len(), 3);
    assert!((outcome.failure_rate() - 0.5).abs() < 1e-12);

    let mut failed: Vec<&str> = outcome
        .failures
        .iter()
        .map(|f| f.identifier.as_str())
        .collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["BROKEN", "TIMEOUT", "UNKNOWN"]);

    let broken = outcome
        .failures
        .iter()
        .find(|f| f.identifier == "BROKEN")
        .unwrap();
    assert!(matches!(broken.error, AnalysisError::InvalidInput(_)));

    let timeout = outcome
        .failures
        .iter()
        .find(|f| f.identifier == "TIMEOUT")
        .unwrap();
    assert!(matches!(
        timeout.error,
        AnalysisError::Upstream {
            source: UpstreamError::Unavailable(_),
            ..
        }
    ));
}

#[test]
fn test_batch_results_ranked_by_magnitude() {
    let outcome = analyzer().analyze_batch(&["MEGA", "MID", "DISTRESSED"]);
    let magnitudes: Vec<f64> = outcome
        .results
        .iter()
        .map(|r| r.spread_diff_bps().abs())
        .collect();
    assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));

    let distressed = outcome
        .results
        .iter()
        .find(|r| r.identifier == "DISTRESSED")
        .unwrap();
    assert_eq!(distressed.rating, CreditRating::CCC);
    assert!(distressed.theoretical_spread_bps > 500.0);
}

#[test]
fn test_batch_top_signals_by_side() {
    let outcome = analyzer().analyze_batch(&["MEGA", "MID", "DISTRESSED"]);
    let long = outcome.top_signals(5, SignalSide::Long);
    let short = outcome.top_signals(5, SignalSide::Short);

    assert!(long.iter().all(|r| r.signal.classification.is_long()));
    assert!(short.iter().all(|r| r.signal.classification.is_short()));
    assert!(long
        .windows(2)
        .all(|w| w[0].spread_diff_bps() <= w[1].spread_diff_bps()));
    let directional = outcome
        .results
        .iter()
        .filter(|r| r.signal.classification != Classification::Neutral)
        .count();
    assert_eq!(long.len() + short.len(), directional);
}

#[test]
fn test_empty_batch() {
    let outcome = analyzer().analyze_batch::<&str>(&[]);
    assert_eq!(outcome.total(), 0);
    assert_eq!(outcome.failure_rate(), 0.0);
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_grid_rows_match_grid(
        equity in 1.0f64..1e6,
        leverage in 0.05f64..5.0,
        vol in 0.05f64..1.5,
        shocks in prop::collection::vec(-1.5f64..1.5, 1..6),
    ) {
        let base = MarketInputs::new(equity, vol, equity * leverage, 0.04, 1.0).unwrap();
        let grid = ShockGrid::new(shocks).unwrap();
        let engine = SensitivityEngine::new(base).with_volatility_grid(grid.clone());
        let rows = engine.volatility_sensitivity();

        prop_assert_eq!(rows.len(), grid.len());
        for (row, shock) in rows.iter().zip(grid.shocks()) {
            prop_assert_eq!(row.shock_pct, shock * 100.0);
            prop_assert_eq!(row.is_failed(), *shock <= -1.0);
            if !row.is_failed() {
                let solution = row.solution.unwrap();
                prop_assert!(solution.asset_value > 0.0 && solution.asset_value.is_finite());
                prop_assert!(solution.asset_vol > 0.0 && solution.asset_vol.is_finite());
            }
        }
    }
}
