//! Single-firm and batch signal analysis.

use std::collections::BTreeMap;

use merton_core::types::InputError;
use merton_models::signals::{CreditRating, Signal};
use merton_models::structural::{Evaluation, StructuralModel};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::batch::{BatchFailure, BatchOutcome};
use super::providers::{EquityDataProvider, MarketSpreadProvider, UpstreamError};
use super::settings::AnalysisSettings;
use crate::parallel::parallel_partition;
use crate::sensitivity::SensitivityReport;

/// Why a single analysis produced no signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The fetched observation is not a valid model input.
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// An upstream provider failed.
    #[error("Upstream failure for {identifier}: {source}")]
    Upstream {
        /// Identifier being analysed
        identifier: String,
        /// Provider error
        source: UpstreamError,
    },

    /// The model produced no theoretical spread.
    #[error("Theoretical spread undefined for {identifier}")]
    UndefinedSpread {
        /// Identifier being analysed
        identifier: String,
    },
}

/// Complete signal analysis of one firm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisResult {
    /// Ticker or other identifier
    pub identifier: String,
    /// Solver output, metrics and leverage
    pub evaluation: Evaluation,
    /// Rating bucket estimated from model leverage
    pub rating: CreditRating,
    /// Market spread for that bucket, in bps
    pub market_spread_bps: f64,
    /// Model-implied credit spread, in bps
    pub theoretical_spread_bps: f64,
    /// Relative-value signal
    pub signal: Signal,
    /// Metadata passed through from the equity snapshot
    pub metadata: BTreeMap<String, String>,
}

impl AnalysisResult {
    /// Theoretical minus market spread, in bps.
    #[inline]
    pub fn spread_diff_bps(&self) -> f64 {
        self.signal.spread_diff_bps
    }
}

/// Runs the full pipeline against a pair of providers.
///
/// fetch → validate → solve → metrics → rating → market spread → signal
pub struct SignalAnalyzer<E, M> {
    equity: E,
    spreads: M,
    settings: AnalysisSettings,
    model: StructuralModel,
}

impl<E, M> SignalAnalyzer<E, M>
where
    E: EquityDataProvider,
    M: MarketSpreadProvider,
{
    /// Analyzer with the given providers and settings.
    pub fn new(equity: E, spreads: M, settings: AnalysisSettings) -> Self {
        let model = settings.model();
        Self {
            equity,
            spreads,
            settings,
            model,
        }
    }

    /// Settings in use.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyse one firm.
    ///
    /// Upstream failures are returned tagged with `identifier` and are not
    /// retried.
    pub fn analyze(&self, identifier: &str) -> Result<AnalysisResult, AnalysisError> {
        let snapshot = self
            .equity
            .fetch(identifier)
            .map_err(|source| AnalysisError::Upstream {
                identifier: identifier.to_string(),
                source,
            })?;

        let inputs =
            snapshot.to_inputs(self.settings.risk_free_rate, self.settings.horizon_years)?;
        let evaluation = self.model.evaluate(&inputs);
        debug!(
            "{}: V={:.4e} sigma_V={:.4} via {}",
            identifier,
            evaluation.solution.asset_value,
            evaluation.solution.asset_vol,
            evaluation.solution.method
        );

        let theoretical_spread_bps = evaluation.metrics.credit_spread_bps.ok_or_else(|| {
            AnalysisError::UndefinedSpread {
                identifier: identifier.to_string(),
            }
        })?;

        let rating = CreditRating::from_leverage(evaluation.leverage.unwrap_or(f64::NAN));
        let market_spread_bps =
            self.spreads
                .spread_bps(rating)
                .map_err(|source| AnalysisError::Upstream {
                    identifier: identifier.to_string(),
                    source,
                })?;

        let signal = self
            .settings
            .thresholds
            .signal(theoretical_spread_bps, market_spread_bps);
        info!("{}: {} [{}]", identifier, signal, rating);

        Ok(AnalysisResult {
            identifier: identifier.to_string(),
            evaluation,
            rating,
            market_spread_bps,
            theoretical_spread_bps,
            signal,
            metadata: snapshot.metadata,
        })
    }

    /// Analyse many firms in parallel.
    ///
    /// One firm's failure never aborts the others. Results are ordered by
    /// `|spread_diff|`, strongest first.
    pub fn analyze_batch<S>(&self, identifiers: &[S]) -> BatchOutcome
    where
        S: AsRef<str> + Sync,
    {
        let (results, failures) = parallel_partition(identifiers, |id| {
            let id = id.as_ref();
            self.analyze(id).map_err(|error| BatchFailure {
                identifier: id.to_string(),
                error,
            })
        });

        let outcome = BatchOutcome::new(results, failures, self.settings.thresholds);

        let total = identifiers.len();
        let failure_rate = outcome.failure_rate();
        if failure_rate > self.settings.max_failure_rate {
            warn!(
                "High failure rate: {}/{} ({:.1}%)",
                outcome.failures.len(),
                total,
                failure_rate * 100.0
            );
        }
        info!(
            "Batch complete: {} successes, {} failures",
            outcome.results.len(),
            outcome.failures.len()
        );

        outcome
    }

    /// Sensitivity report for a previous result against its own market spread.
    pub fn sensitivity(&self, result: &AnalysisResult) -> SensitivityReport {
        self.settings
            .sensitivity_engine(result.evaluation.inputs)
            .generate_report(result.market_spread_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::providers::{EquitySnapshot, RatingSpreadTable};
    use merton_models::signals::Classification;
    use std::collections::HashMap;

    struct MapProvider(HashMap<&'static str, EquitySnapshot>);

    impl EquityDataProvider for MapProvider {
        fn fetch(&self, identifier: &str) -> Result<EquitySnapshot, UpstreamError> {
            self.0
                .get(identifier)
                .cloned()
                .ok_or_else(|| UpstreamError::NotFound(identifier.to_string()))
        }
    }

    struct DownSpreads;

    impl MarketSpreadProvider for DownSpreads {
        fn spread_bps(&self, _rating: CreditRating) -> Result<f64, UpstreamError> {
            Err(UpstreamError::Unavailable("spread feed offline".to_string()))
        }
    }

    fn provider() -> MapProvider {
        let mut map = HashMap::new();
        map.insert(
            "SAFE",
            EquitySnapshot::new("SAFE", 100.0, 0.40, 80.0).with_metadata("sector", "Utilities"),
        );
        map.insert("ZERO", EquitySnapshot::new("ZERO", 100.0, 0.40, 0.0));
        MapProvider(map)
    }

    fn analyzer() -> SignalAnalyzer<MapProvider, RatingSpreadTable> {
        let table = RatingSpreadTable::new().with_spread(CreditRating::BBB, 180.0);
        SignalAnalyzer::new(provider(), table, AnalysisSettings::default())
    }

    #[test]
    fn test_analyze_single() {
        let result = analyzer().analyze("SAFE").unwrap();

        assert_eq!(result.identifier, "SAFE");
        // D / V ≈ 80 / 176 → BBB bucket
        assert_eq!(result.rating, CreditRating::BBB);
        assert_eq!(result.market_spread_bps, 180.0);
        assert!(result.theoretical_spread_bps < 10.0);
        assert_eq!(result.signal.classification, Classification::LongStrong);
        assert_eq!(
            result.spread_diff_bps(),
            result.theoretical_spread_bps - 180.0
        );
        assert_eq!(result.metadata["sector"], "Utilities");
    }

    #[test]
    fn test_upstream_error_is_tagged() {
        let err = analyzer().analyze("MISSING").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Upstream {
                identifier: "MISSING".to_string(),
                source: UpstreamError::NotFound("MISSING".to_string()),
            }
        );
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let err = analyzer().analyze("ZERO").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(ref e) if e.field() == "debt_face"));
    }

    #[test]
    fn test_spread_provider_failure() {
        let analyzer = SignalAnalyzer::new(provider(), DownSpreads, AnalysisSettings::default());
        let err = analyzer.analyze("SAFE").unwrap_err();
        assert!(err.to_string().contains("spread feed offline"));
    }

    #[test]
    fn test_sensitivity_for_result() {
        let analyzer = analyzer();
        let result = analyzer.analyze("SAFE").unwrap();
        let report = analyzer.sensitivity(&result);

        assert_eq!(report.market_spread_bps, 180.0);
        assert_eq!(report.base, result.evaluation);
    }
}
