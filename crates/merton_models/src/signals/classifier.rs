//! Relative-value signal from the theoretical vs. market spread difference.
//!
//! `diff = theoretical − market` (bps). A positive difference means the
//! model sees more credit risk than the market prices in (short credit);
//! a negative difference means the market is too pessimistic (long credit).

use std::fmt;

use thiserror::Error;

/// Default strong-signal threshold in bps.
pub const DEFAULT_STRONG_BPS: f64 = 150.0;

/// Default moderate-signal threshold in bps.
pub const DEFAULT_MODERATE_BPS: f64 = 75.0;

/// `|diff|` breakpoints for signal strength; strength is the count exceeded.
pub const STRENGTH_BREAKPOINTS_BPS: [f64; 5] = [25.0, 75.0, 150.0, 200.0, 300.0];

/// Invalid signal thresholds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    /// A threshold is NaN or infinite.
    #[error("Signal threshold must be finite: strong={strong}, moderate={moderate}")]
    NonFinite {
        /// Strong threshold supplied
        strong: f64,
        /// Moderate threshold supplied
        moderate: f64,
    },

    /// Thresholds are not ordered `strong ≥ moderate ≥ 0`.
    #[error("Thresholds need strong >= moderate >= 0: strong={strong}, moderate={moderate}")]
    Misordered {
        /// Strong threshold supplied
        strong: f64,
        /// Moderate threshold supplied
        moderate: f64,
    },
}

/// Classification thresholds in basis points.
///
/// # Examples
/// ```
/// use merton_models::signals::SignalThresholds;
///
/// let t = SignalThresholds::default();
/// assert_eq!(t.strong_bps(), 150.0);
/// assert_eq!(t.moderate_bps(), 75.0);
///
/// assert!(SignalThresholds::new(50.0, 75.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalThresholds {
    strong_bps: f64,
    moderate_bps: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_bps: DEFAULT_STRONG_BPS,
            moderate_bps: DEFAULT_MODERATE_BPS,
        }
    }
}

impl SignalThresholds {
    /// Creates validated thresholds.
    ///
    /// # Errors
    /// - `ThresholdError::NonFinite` if either value is NaN or infinite
    /// - `ThresholdError::Misordered` unless `strong ≥ moderate ≥ 0`
    pub fn new(strong_bps: f64, moderate_bps: f64) -> Result<Self, ThresholdError> {
        if !strong_bps.is_finite() || !moderate_bps.is_finite() {
            return Err(ThresholdError::NonFinite {
                strong: strong_bps,
                moderate: moderate_bps,
            });
        }
        if !(strong_bps >= moderate_bps && moderate_bps >= 0.0) {
            return Err(ThresholdError::Misordered {
                strong: strong_bps,
                moderate: moderate_bps,
            });
        }
        Ok(Self {
            strong_bps,
            moderate_bps,
        })
    }

    /// Strong-signal threshold.
    #[inline]
    pub fn strong_bps(&self) -> f64 {
        self.strong_bps
    }

    /// Moderate-signal threshold.
    #[inline]
    pub fn moderate_bps(&self) -> f64 {
        self.moderate_bps
    }

    /// Classify a spread difference (first matching rule wins).
    ///
    /// | Rule                | Result          |
    /// |---------------------|-----------------|
    /// | `diff > strong`     | `ShortStrong`   |
    /// | `diff > moderate`   | `ShortModerate` |
    /// | `diff < −strong`    | `LongStrong`    |
    /// | `diff < −moderate`  | `LongModerate`  |
    /// | otherwise (or NaN)  | `Neutral`       |
    pub fn classify(&self, spread_diff_bps: f64) -> Classification {
        if spread_diff_bps > self.strong_bps {
            Classification::ShortStrong
        } else if spread_diff_bps > self.moderate_bps {
            Classification::ShortModerate
        } else if spread_diff_bps < -self.strong_bps {
            Classification::LongStrong
        } else if spread_diff_bps < -self.moderate_bps {
            Classification::LongModerate
        } else {
            Classification::Neutral
        }
    }

    /// Full signal for a theoretical and a market spread.
    pub fn signal(&self, theoretical_bps: f64, market_bps: f64) -> Signal {
        let diff = theoretical_bps - market_bps;
        Signal {
            classification: self.classify(diff),
            strength: SignalStrength::from_spread_diff(diff),
            spread_diff_bps: diff,
        }
    }
}

/// Five-way trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    /// Model spread far above market: short credit.
    ShortStrong,
    /// Model spread moderately above market.
    ShortModerate,
    /// No actionable difference.
    Neutral,
    /// Model spread moderately below market.
    LongModerate,
    /// Model spread far below market: long credit.
    LongStrong,
}

impl Classification {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortStrong => "SHORT CREDIT",
            Self::ShortModerate => "SHORT CREDIT (Moderate)",
            Self::Neutral => "NEUTRAL",
            Self::LongModerate => "LONG CREDIT (Moderate)",
            Self::LongStrong => "LONG CREDIT",
        }
    }

    /// Whether this is a short-credit signal.
    pub fn is_short(&self) -> bool {
        matches!(self, Self::ShortStrong | Self::ShortModerate)
    }

    /// Whether this is a long-credit signal.
    pub fn is_long(&self) -> bool {
        matches!(self, Self::LongStrong | Self::LongModerate)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordinal signal strength in `0..=5`.
///
/// Rendered as stars only through `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalStrength(u8);

impl SignalStrength {
    /// Highest strength.
    pub const MAX: SignalStrength = SignalStrength(5);

    /// Number of breakpoints `{25, 75, 150, 200, 300}` strictly exceeded by `|diff|`.
    ///
    /// # Examples
    /// ```
    /// use merton_models::signals::SignalStrength;
    ///
    /// assert_eq!(SignalStrength::from_spread_diff(10.0).value(), 0);
    /// assert_eq!(SignalStrength::from_spread_diff(-80.0).value(), 2);
    /// assert_eq!(SignalStrength::from_spread_diff(300.0).value(), 4);
    /// assert_eq!(SignalStrength::from_spread_diff(301.0).to_string(), "★★★★★");
    /// ```
    pub fn from_spread_diff(spread_diff_bps: f64) -> Self {
        let magnitude = spread_diff_bps.abs();
        let count = STRENGTH_BREAKPOINTS_BPS
            .iter()
            .filter(|&&bp| magnitude > bp)
            .count();
        Self(count as u8)
    }

    /// Ordinal value.
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 {
            f.write_str("★")?;
        }
        Ok(())
    }
}

/// Classified signal with its strength and the underlying difference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    /// Trading classification.
    pub classification: Classification,
    /// Ordinal strength.
    pub strength: SignalStrength,
    /// Theoretical minus market spread, in bps.
    pub spread_diff_bps: f64,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({:+.0} bps)",
            self.classification, self.strength, self.spread_diff_bps
        )
    }
}
