//! Rating buckets used to pick a market spread benchmark.

use std::fmt;
use std::str::FromStr;

/// Letter rating bucket.
///
/// Ordered from best (`AAA`) to worst (`CCC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreditRating {
    /// AAA
    AAA,
    /// AA
    AA,
    /// A
    A,
    /// BBB
    BBB,
    /// BB
    BB,
    /// B
    B,
    /// CCC and below
    CCC,
}

/// Upper leverage bound (exclusive) for each bucket reachable from leverage.
const LEVERAGE_CUTOFFS: [(f64, CreditRating); 5] = [
    (0.20, CreditRating::AA),
    (0.35, CreditRating::A),
    (0.50, CreditRating::BBB),
    (0.65, CreditRating::BB),
    (0.80, CreditRating::B),
];

impl CreditRating {
    /// All buckets, best first.
    pub const ALL: [CreditRating; 7] = [
        CreditRating::AAA,
        CreditRating::AA,
        CreditRating::A,
        CreditRating::BBB,
        CreditRating::BB,
        CreditRating::B,
        CreditRating::CCC,
    ];

    /// Estimate a bucket from model leverage `D / V`.
    ///
    /// `< 0.20 → AA`, `< 0.35 → A`, `< 0.50 → BBB`, `< 0.65 → BB`,
    /// `< 0.80 → B`, otherwise (including non-finite) `CCC`. `AAA` is never
    /// assigned from leverage alone.
    ///
    /// # Examples
    /// ```
    /// use merton_models::signals::CreditRating;
    ///
    /// assert_eq!(CreditRating::from_leverage(0.10), CreditRating::AA);
    /// assert_eq!(CreditRating::from_leverage(0.50), CreditRating::BB);
    /// assert_eq!(CreditRating::from_leverage(f64::NAN), CreditRating::CCC);
    /// ```
    pub fn from_leverage(leverage: f64) -> Self {
        if !leverage.is_finite() {
            return CreditRating::CCC;
        }
        LEVERAGE_CUTOFFS
            .iter()
            .find(|(cutoff, _)| leverage < *cutoff)
            .map(|&(_, rating)| rating)
            .unwrap_or(CreditRating::CCC)
    }

    /// Rating symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRating::AAA => "AAA",
            CreditRating::AA => "AA",
            CreditRating::A => "A",
            CreditRating::BBB => "BBB",
            CreditRating::BB => "BB",
            CreditRating::B => "B",
            CreditRating::CCC => "CCC",
        }
    }

    /// Whether the bucket is investment grade (BBB or better).
    pub fn is_investment_grade(&self) -> bool {
        *self <= CreditRating::BBB
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moody's symbols (digits stripped) that differ from the S&P scale.
const MOODYS_ALIASES: [(&str, CreditRating); 5] = [
    ("BAA", CreditRating::BBB),
    ("BA", CreditRating::BB),
    ("CAA", CreditRating::CCC),
    ("CA", CreditRating::CCC),
    ("C", CreditRating::CCC),
];

impl FromStr for CreditRating {
    type Err = String;

    /// Parses an S&P or Moody's symbol, ignoring case and notches
    /// (`+`/`-`, `1`/`2`/`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        CreditRating::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == normalised)
            .or_else(|| {
                MOODYS_ALIASES
                    .iter()
                    .find(|(symbol, _)| *symbol == normalised)
                    .map(|&(_, rating)| rating)
            })
            .ok_or_else(|| format!("Unknown credit rating: {}", s))
    }
}
