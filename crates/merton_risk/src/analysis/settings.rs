//! Validated analysis settings built from [`AnalysisConfig`].

use infra_config::AnalysisConfig;
use merton_core::types::MarketInputs;
use merton_models::signals::{SignalThresholds, ThresholdError};
use merton_models::structural::{ModelParams, ModelParamsError, StructuralModel};
use thiserror::Error;

use crate::sensitivity::{GridError, SensitivityEngine, ShockGrid};

/// Default failure fraction above which a batch logs a warning.
pub const DEFAULT_MAX_FAILURE_RATE: f64 = 0.30;

/// Configuration values that cannot be turned into model types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Invalid signal thresholds.
    #[error(transparent)]
    Thresholds(#[from] ThresholdError),

    /// Invalid model parameters.
    #[error(transparent)]
    Model(#[from] ModelParamsError),

    /// Invalid shock grid.
    #[error("Invalid {name} grid: {source}")]
    Grid {
        /// Which grid
        name: &'static str,
        /// Underlying error
        source: GridError,
    },

    /// Failure rate outside `[0, 1]`.
    #[error("Invalid max failure rate: {0} (must be within [0, 1])")]
    FailureRate(f64),

    /// Non-finite rate or non-positive horizon.
    #[error("Invalid market parameter {name}: {value}")]
    Market {
        /// Parameter name
        name: &'static str,
        /// Supplied value
        value: f64,
    },
}

/// Everything an analysis run needs, in model types.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Classification thresholds
    pub thresholds: SignalThresholds,
    /// Metric parameters (recovery rate)
    pub params: ModelParams,
    /// Annualised risk-free rate applied to every firm
    pub risk_free_rate: f64,
    /// Debt horizon in years applied to every firm
    pub horizon_years: f64,
    /// Volatility sensitivity grid
    pub volatility_grid: ShockGrid,
    /// Debt sensitivity grid
    pub debt_grid: ShockGrid,
    /// Robustness grid
    pub robustness_grid: ShockGrid,
    /// Batch failure fraction that triggers a warning
    pub max_failure_rate: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            thresholds: SignalThresholds::default(),
            params: ModelParams::default(),
            risk_free_rate: 0.0352,
            horizon_years: 1.0,
            volatility_grid: ShockGrid::default(),
            debt_grid: ShockGrid::default(),
            robustness_grid: ShockGrid::robustness(),
            max_failure_rate: DEFAULT_MAX_FAILURE_RATE,
        }
    }
}

impl AnalysisSettings {
    /// Convert a loaded configuration.
    ///
    /// # Examples
    /// ```
    /// use infra_config::AnalysisConfig;
    /// use merton_risk::analysis::AnalysisSettings;
    ///
    /// let settings = AnalysisSettings::from_config(&AnalysisConfig::default()).unwrap();
    /// assert_eq!(settings, AnalysisSettings::default());
    /// ```
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, SettingsError> {
        let thresholds =
            SignalThresholds::new(config.signal.strong_bps, config.signal.moderate_bps)?;
        let params = ModelParams::new(config.model.recovery_rate)?;

        let risk_free_rate = config.model.risk_free_rate;
        if !risk_free_rate.is_finite() {
            return Err(SettingsError::Market {
                name: "risk_free_rate",
                value: risk_free_rate,
            });
        }
        let horizon_years = config.model.horizon_years;
        if !(horizon_years.is_finite() && horizon_years > 0.0) {
            return Err(SettingsError::Market {
                name: "horizon_years",
                value: horizon_years,
            });
        }

        let grid = |name: &'static str, shocks: &[f64]| {
            ShockGrid::new(shocks.to_vec()).map_err(|source| SettingsError::Grid { name, source })
        };
        let volatility_grid = grid("volatility", &config.sensitivity.volatility_shocks)?;
        let debt_grid = grid("debt", &config.sensitivity.debt_shocks)?;
        let robustness_grid = grid("robustness", &config.sensitivity.robustness_shocks)?;

        let max_failure_rate = config.batch.max_failure_rate;
        if !(0.0..=1.0).contains(&max_failure_rate) {
            return Err(SettingsError::FailureRate(max_failure_rate));
        }

        Ok(Self {
            thresholds,
            params,
            risk_free_rate,
            horizon_years,
            volatility_grid,
            debt_grid,
            robustness_grid,
            max_failure_rate,
        })
    }

    /// Structural model with these parameters and the default solver.
    pub fn model(&self) -> StructuralModel {
        StructuralModel::with_params(self.params)
    }

    /// Sensitivity engine for `base` using these thresholds and grids.
    pub fn sensitivity_engine(&self, base: MarketInputs) -> SensitivityEngine {
        SensitivityEngine::new(base)
            .with_model(self.model())
            .with_thresholds(self.thresholds)
            .with_volatility_grid(self.volatility_grid.clone())
            .with_debt_grid(self.debt_grid.clone())
            .with_robustness_grid(self.robustness_grid.clone())
    }
}
