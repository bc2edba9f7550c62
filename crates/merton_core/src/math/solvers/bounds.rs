//! Box constraints for bounded optimisation.

use crate::types::SolverError;

/// Per-parameter closed interval `[lower_i, upper_i]`.
///
/// Bounded solvers keep every iterate inside the box by projecting trial
/// points onto it.
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::ParameterBounds;
///
/// let bounds = ParameterBounds::new(vec![0.0, 0.01], vec![10.0, 3.0]).unwrap();
/// let mut p = vec![12.0, -1.0];
/// bounds.project(&mut p);
/// assert_eq!(p, vec![10.0, 0.01]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl ParameterBounds {
    /// Create bounds from matching lower/upper vectors.
    ///
    /// # Errors
    /// - `SolverError::DimensionMismatch` if the vectors differ in length
    /// - `SolverError::InvalidBounds` if any `lower_i > upper_i` or a bound is NaN
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.len() != upper.len() {
            return Err(SolverError::DimensionMismatch {
                expected: lower.len(),
                got: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(SolverError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of bounded parameters.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether the box has zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Clamp `params` onto the box in place.
    pub fn project(&self, params: &mut [f64]) {
        for ((p, &lo), &hi) in params.iter_mut().zip(&self.lower).zip(&self.upper) {
            *p = p.clamp(lo, hi);
        }
    }

    /// Whether `params` lies inside the box.
    pub fn contains(&self, params: &[f64]) -> bool {
        params.len() == self.len()
            && params
                .iter()
                .zip(&self.lower)
                .zip(&self.upper)
                .all(|((&p, &lo), &hi)| p >= lo && p <= hi)
    }
}
