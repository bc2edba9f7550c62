//! Shock grids.

use std::fmt;

use thiserror::Error;

/// Default volatility and debt grid: −30% to +30% in 10% steps.
pub const DEFAULT_SHOCKS: [f64; 7] = [-0.30, -0.20, -0.10, 0.0, 0.10, 0.20, 0.30];

/// Default robustness grid: −20% to +20% in 10% steps.
pub const DEFAULT_ROBUSTNESS_SHOCKS: [f64; 5] = [-0.20, -0.10, 0.0, 0.10, 0.20];

/// Invalid shock grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// No shocks supplied.
    #[error("Shock grid must not be empty")]
    Empty,

    /// A shock is NaN or infinite.
    #[error("Shock must be finite: {0}")]
    NonFinite(f64),
}

/// Input dimension a shock is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShockDimension {
    /// Equity volatility σE
    Volatility,
    /// Debt face value D
    Debt,
}

impl ShockDimension {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Volatility => "Volatility",
            Self::Debt => "Debt",
        }
    }
}

impl fmt::Display for ShockDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sorted, de-duplicated relative shocks (`0.1` = +10%).
///
/// # Examples
/// ```
/// use merton_risk::sensitivity::ShockGrid;
///
/// let grid = ShockGrid::new(vec![0.2, -0.2, 0.0, 0.2]).unwrap();
/// assert_eq!(grid.shocks(), &[-0.2, 0.0, 0.2]);
/// assert_eq!(grid.nonzero().count(), 2);
///
/// assert!(ShockGrid::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShockGrid {
    shocks: Vec<f64>,
}

impl Default for ShockGrid {
    fn default() -> Self {
        Self {
            shocks: DEFAULT_SHOCKS.to_vec(),
        }
    }
}

impl ShockGrid {
    /// Creates a grid, sorting ascending and dropping duplicates.
    ///
    /// # Errors
    /// - `GridError::Empty` if `shocks` is empty
    /// - `GridError::NonFinite` if any shock is NaN or infinite
    pub fn new(shocks: Vec<f64>) -> Result<Self, GridError> {
        if shocks.is_empty() {
            return Err(GridError::Empty);
        }
        if let Some(&bad) = shocks.iter().find(|s| !s.is_finite()) {
            return Err(GridError::NonFinite(bad));
        }

        let mut shocks = shocks;
        shocks.sort_by(f64::total_cmp);
        // -0.0 sorts next to 0.0 and compares equal to it
        shocks.dedup();

        Ok(Self { shocks })
    }

    /// The robustness-check grid (±20%).
    pub fn robustness() -> Self {
        Self {
            shocks: DEFAULT_ROBUSTNESS_SHOCKS.to_vec(),
        }
    }

    /// Shocks in ascending order.
    #[inline]
    pub fn shocks(&self) -> &[f64] {
        &self.shocks
    }

    /// Number of shock points.
    #[inline]
    pub fn len(&self) -> usize {
        self.shocks.len()
    }

    /// Always `false` for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shocks.is_empty()
    }

    /// Shocks other than zero.
    pub fn nonzero(&self) -> impl Iterator<Item = f64> + '_ {
        self.shocks.iter().copied().filter(|s| *s != 0.0)
    }
}
