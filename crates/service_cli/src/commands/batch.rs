//! Batch command implementation
//!
//! Analyses every firm in a JSON universe file against a rating spread table.
//!
//! ```json
//! {
//!   "spreads": { "AA": 60, "A": 90, "Baa2": 150, "BB": 280 },
//!   "firms": [
//!     { "identifier": "ACME", "equity_value": 100.0, "equity_vol": 0.4, "debt_face": 80.0 }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use clap::Args;
use merton_models::signals::CreditRating;
use merton_risk::analysis::{
    AnalysisResult, AnalysisSettings, BatchOutcome, EquityDataProvider, EquitySnapshot,
    RatingSpreadTable, SignalAnalyzer, SignalSide, UpstreamError,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::output::{emit, OutputFormat};
use crate::{CliError, Result};

/// Arguments for the batch command
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Path to the JSON universe file
    #[arg(short, long)]
    pub input: String,

    /// Number of long and short signals to list
    #[arg(short = 'n', long, default_value = "5")]
    pub top: usize,
}

/// One firm in the universe file.
#[derive(Debug, Clone, Deserialize)]
pub struct FirmRecord {
    /// Ticker or other identifier
    pub identifier: String,
    /// Market capitalisation
    pub equity_value: f64,
    /// Annualised equity volatility
    pub equity_vol: f64,
    /// Face value of debt
    pub debt_face: f64,
    /// Descriptive fields carried into the result
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<FirmRecord> for EquitySnapshot {
    fn from(record: FirmRecord) -> Self {
        EquitySnapshot {
            identifier: record.identifier,
            equity_value: record.equity_value,
            equity_vol: record.equity_vol,
            debt_face: record.debt_face,
            metadata: record.metadata,
        }
    }
}

/// Universe file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Universe {
    /// Market spread by rating symbol (S&P or Moody's), in bps
    #[serde(default)]
    pub spreads: BTreeMap<String, f64>,
    /// Firms to analyse
    pub firms: Vec<FirmRecord>,
}

impl Universe {
    /// Read and parse a universe file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Spread table keyed by parsed rating.
    pub fn spread_table(&self) -> Result<RatingSpreadTable> {
        self.spreads
            .iter()
            .map(|(symbol, &bps)| {
                symbol
                    .parse::<CreditRating>()
                    .map(|rating| (rating, bps))
                    .map_err(CliError::InvalidArgument)
            })
            .collect()
    }

    /// Identifiers in file order.
    pub fn identifiers(&self) -> Vec<String> {
        self.firms.iter().map(|f| f.identifier.clone()).collect()
    }
}

/// Equity provider over an in-memory universe.
#[derive(Debug, Default)]
pub struct StaticEquityProvider {
    snapshots: HashMap<String, EquitySnapshot>,
}

impl FromIterator<EquitySnapshot> for StaticEquityProvider {
    fn from_iter<I: IntoIterator<Item = EquitySnapshot>>(iter: I) -> Self {
        Self {
            snapshots: iter
                .into_iter()
                .map(|s| (s.identifier.clone(), s))
                .collect(),
        }
    }
}

impl EquityDataProvider for StaticEquityProvider {
    fn fetch(&self, identifier: &str) -> std::result::Result<EquitySnapshot, UpstreamError> {
        self.snapshots
            .get(identifier)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(identifier.to_string()))
    }
}

/// Failure line for output.
#[derive(Debug, Clone, Serialize)]
pub struct FailureView {
    /// Identifier that failed
    pub identifier: String,
    /// Error message
    pub error: String,
}

/// Printable batch summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Successful analyses, strongest first
    pub results: Vec<AnalysisResult>,
    /// Failed identifiers
    pub failures: Vec<FailureView>,
    /// Fraction of the universe that failed
    pub failure_rate: f64,
    /// Top long identifiers
    pub top_long: Vec<String>,
    /// Top short identifiers
    pub top_short: Vec<String>,
}

impl BatchSummary {
    /// Summarise an outcome keeping up to `top` signals per side.
    pub fn new(outcome: &BatchOutcome, top: usize) -> Self {
        let ids = |side: SignalSide| -> Vec<String> {
            outcome
                .top_signals(top, side)
                .into_iter()
                .map(|r| r.identifier.clone())
                .collect()
        };
        Self {
            results: outcome.results.clone(),
            failures: outcome
                .failures
                .iter()
                .map(|f| FailureView {
                    identifier: f.identifier.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            failure_rate: outcome.failure_rate(),
            top_long: ids(SignalSide::Long),
            top_short: ids(SignalSide::Short),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>6} {:>12} {:>12} {:>10}  {}",
            "Id", "Rating", "Theo (bps)", "Mkt (bps)", "Diff", "Signal"
        )?;
        for r in &self.results {
            writeln!(
                f,
                "{:<10} {:>6} {:>12.2} {:>12.2} {:>+10.2}  {}",
                r.identifier,
                r.rating.as_str(),
                r.theoretical_spread_bps,
                r.market_spread_bps,
                r.spread_diff_bps(),
                r.signal.classification
            )?;
        }
        if !self.failures.is_empty() {
            writeln!(f, "\nFailures ({:.1}%):", self.failure_rate * 100.0)?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.identifier, failure.error)?;
            }
        }
        writeln!(f, "\nTop long:  {}", self.top_long.join(", "))?;
        write!(f, "Top short: {}", self.top_short.join(", "))
    }
}

/// Analyse a parsed universe.
pub fn analyze(universe: Universe, settings: &AnalysisSettings) -> Result<BatchOutcome> {
    let table = universe.spread_table()?;
    let identifiers = universe.identifiers();
    let provider: StaticEquityProvider = universe.firms.into_iter().map(Into::into).collect();

    let analyzer = SignalAnalyzer::new(provider, table, settings.clone());
    Ok(analyzer.analyze_batch(&identifiers))
}

/// Run the batch command
pub fn run(args: &BatchArgs, settings: &AnalysisSettings, format: OutputFormat) -> Result<()> {
    info!("Loading universe from {}", args.input);
    let universe = Universe::load(Path::new(&args.input))?;
    info!("Analysing {} firms", universe.firms.len());

    let outcome = analyze(universe, settings)?;
    emit(format, &BatchSummary::new(&outcome, args.top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const UNIVERSE: &str = r#"{
        "spreads": { "AA": 60, "A": 90, "Baa2": 150, "BB": 280, "B": 420, "Caa1": 900 },
        "firms": [
            { "identifier": "MEGA", "equity_value": 3e12, "equity_vol": 0.25, "debt_face": 1e11,
              "metadata": { "sector": "Technology" } },
            { "identifier": "MID", "equity_value": 100.0, "equity_vol": 0.40, "debt_face": 80.0 },
            { "identifier": "BROKEN", "equity_value": 100.0, "equity_vol": -0.40,
              "debt_face": 80.0 }
        ]
    }"#;

    #[test]
    fn test_spread_table_accepts_moodys_symbols() {
        let universe: Universe = serde_json::from_str(UNIVERSE).unwrap();
        let table = universe.spread_table().unwrap();
        assert_eq!(table.get(CreditRating::BBB), Some(150.0));
        assert_eq!(table.get(CreditRating::CCC), Some(900.0));
    }

    #[test]
    fn test_unknown_rating_symbol() {
        let universe: Universe =
            serde_json::from_str(r#"{ "spreads": { "ZZZ": 10 }, "firms": [] }"#).unwrap();
        assert!(matches!(
            universe.spread_table(),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_batch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(UNIVERSE.as_bytes()).unwrap();

        let universe = Universe::load(file.path()).unwrap();
        let outcome = analyze(universe, &AnalysisSettings::default()).unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].identifier, "BROKEN");

        let mega = outcome
            .results
            .iter()
            .find(|r| r.identifier == "MEGA")
            .unwrap();
        assert_eq!(mega.rating, CreditRating::AA);
        assert_eq!(mega.metadata["sector"], "Technology");

        let summary = BatchSummary::new(&outcome, 5);
        assert_eq!(summary.top_long, vec!["MID".to_string()]);
        assert!(summary.to_string().contains("BROKEN"));
    }

    #[test]
    fn test_missing_file() {
        let err = Universe::load(Path::new("/nonexistent/universe.json")).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
