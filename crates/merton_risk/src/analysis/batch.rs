//! Batch analysis outcome and ranking.

use merton_models::signals::SignalThresholds;

use super::analyzer::{AnalysisError, AnalysisResult};

/// A firm the batch could not analyse.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// Identifier that failed
    pub identifier: String,
    /// Why it failed
    pub error: AnalysisError,
}

/// Which side of the book to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSide {
    /// Model spread below market by more than the moderate threshold
    Long,
    /// Model spread above market by more than the moderate threshold
    Short,
}

/// Successes and failures of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Successful analyses, largest `|spread_diff|` first
    pub results: Vec<AnalysisResult>,
    /// Failed identifiers
    pub failures: Vec<BatchFailure>,
    thresholds: SignalThresholds,
}

impl BatchOutcome {
    /// Builds an outcome, ordering `results` by `|spread_diff|` descending.
    pub fn new(
        mut results: Vec<AnalysisResult>,
        failures: Vec<BatchFailure>,
        thresholds: SignalThresholds,
    ) -> Self {
        results.sort_by(|a, b| {
            b.spread_diff_bps()
                .abs()
                .total_cmp(&a.spread_diff_bps().abs())
        });
        Self {
            results,
            failures,
            thresholds,
        }
    }

    /// Number of identifiers attempted.
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Fraction of identifiers that failed; zero for an empty batch.
    pub fn failure_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.failures.len() as f64 / n as f64,
        }
    }

    /// Up to `n` strongest signals on one side.
    ///
    /// Long: `diff < −moderate`, most negative first. Short:
    /// `diff > moderate`, most positive first.
    pub fn top_signals(&self, n: usize, side: SignalSide) -> Vec<&AnalysisResult> {
        let moderate = self.thresholds.moderate_bps();
        let mut picked: Vec<&AnalysisResult> = self
            .results
            .iter()
            .filter(|r| match side {
                SignalSide::Long => r.spread_diff_bps() < -moderate,
                SignalSide::Short => r.spread_diff_bps() > moderate,
            })
            .collect();

        match side {
            SignalSide::Long => {
                picked.sort_by(|a, b| a.spread_diff_bps().total_cmp(&b.spread_diff_bps()))
            }
            SignalSide::Short => {
                picked.sort_by(|a, b| b.spread_diff_bps().total_cmp(&a.spread_diff_bps()))
            }
        }
        picked.truncate(n);
        picked
    }
}
