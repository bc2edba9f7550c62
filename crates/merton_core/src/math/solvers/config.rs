//! Solver configuration types.

/// Configuration for the damped Newton system solver.
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::SolverConfig;
///
/// // Use default configuration
/// let config = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
/// assert!(config.max_iterations >= 50);
///
/// // Custom configuration
/// let custom = SolverConfig {
///     tolerance: 1e-6,
///     max_iterations: 100,
///     max_backtracks: 40,
/// };
/// assert_eq!(custom.max_backtracks, 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Absolute residual tolerance.
    ///
    /// The solver stops when every residual component satisfies
    /// `|f_i(x)| < tolerance`.
    pub tolerance: f64,

    /// Maximum number of Newton iterations before giving up.
    ///
    /// If the solver doesn't converge within this limit,
    /// it returns `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,

    /// Maximum number of step halvings in the backtracking line search.
    pub max_backtracks: usize,
}

impl Default for SolverConfig {
    /// Default values:
    /// - `tolerance`: 1e-10
    /// - `max_iterations`: 100
    /// - `max_backtracks`: 40
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            max_backtracks: 40,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with the default line-search budget.
    ///
    /// # Arguments
    ///
    /// * `tolerance` - Absolute residual tolerance (must be positive)
    /// * `max_iterations` - Maximum iteration count (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use merton_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-6, 100);
    /// assert_eq!(config.max_iterations, 100);
    /// ```
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        assert!(tolerance > 0.0, "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Replace the line-search budget.
    pub fn with_max_backtracks(mut self, max_backtracks: usize) -> Self {
        self.max_backtracks = max_backtracks;
        self
    }

    /// Create a configuration with high precision settings.
    ///
    /// Uses tighter tolerance (1e-14) and more iterations (500).
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 500,
            ..Default::default()
        }
    }
}
