//! Analysis configuration management
//!
//! Handles loading configuration from TOML files and `MERTON_*` environment
//! variables. Values are plain numbers here; conversion into validated model
//! types happens in the crates that own those types.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable names recognised by [`AnalysisConfig::from_env`].
pub mod env_vars {
    /// Strong signal threshold (bps)
    pub const SIGNAL_STRONG_BPS: &str = "MERTON_SIGNAL_STRONG_BPS";
    /// Moderate signal threshold (bps)
    pub const SIGNAL_MODERATE_BPS: &str = "MERTON_SIGNAL_MODERATE_BPS";
    /// Annualised risk-free rate
    pub const RISK_FREE_RATE: &str = "MERTON_RISK_FREE_RATE";
    /// Debt horizon in years
    pub const HORIZON_YEARS: &str = "MERTON_HORIZON_YEARS";
    /// Recovery rate in `[0, 1]`
    pub const RECOVERY_RATE: &str = "MERTON_RECOVERY_RATE";
    /// Batch failure-rate warning level
    pub const MAX_FAILURE_RATE: &str = "MERTON_MAX_FAILURE_RATE";
    /// Log level
    pub const LOG_LEVEL: &str = "MERTON_LOG_LEVEL";

    /// Every recognised variable.
    pub const ALL: [&str; 7] = [
        SIGNAL_STRONG_BPS,
        SIGNAL_MODERATE_BPS,
        RISK_FREE_RATE,
        HORIZON_YEARS,
        RECOVERY_RATE,
        MAX_FAILURE_RATE,
        LOG_LEVEL,
    ];
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// A value is outside its allowed range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `model.horizon_years`
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Environment variable could not be parsed.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Info
    #[default]
    Info,
    /// Warn
    Warn,
    /// Error
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// `[signal]` section: classification thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SignalSection {
    /// Strong threshold in bps
    pub strong_bps: f64,
    /// Moderate threshold in bps
    pub moderate_bps: f64,
}

impl Default for SignalSection {
    fn default() -> Self {
        Self {
            strong_bps: 150.0,
            moderate_bps: 75.0,
        }
    }
}

/// `[model]` section: market-wide model parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Annualised risk-free rate
    pub risk_free_rate: f64,
    /// Debt horizon in years
    pub horizon_years: f64,
    /// Recovery rate in `[0, 1]`
    pub recovery_rate: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0352,
            horizon_years: 1.0,
            recovery_rate: 0.40,
        }
    }
}

/// `[sensitivity]` section: shock grids as fractions (`0.1` = +10%).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensitivitySection {
    /// Equity volatility shocks
    pub volatility_shocks: Vec<f64>,
    /// Debt face value shocks
    pub debt_shocks: Vec<f64>,
    /// Volatility shocks used for the robustness check
    pub robustness_shocks: Vec<f64>,
}

impl Default for SensitivitySection {
    fn default() -> Self {
        let grid = vec![-0.30, -0.20, -0.10, 0.0, 0.10, 0.20, 0.30];
        Self {
            volatility_shocks: grid.clone(),
            debt_shocks: grid,
            robustness_shocks: vec![-0.20, -0.10, 0.0, 0.10, 0.20],
        }
    }
}

/// `[batch]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Failure fraction above which a batch logs a warning
    pub max_failure_rate: f64,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            max_failure_rate: 0.30,
        }
    }
}

/// Top-level configuration.
///
/// Every section is optional in TOML; missing keys take their defaults.
///
/// # Examples
/// ```
/// use infra_config::AnalysisConfig;
///
/// let config: AnalysisConfig = toml::from_str(
///     r#"
///     [signal]
///     strong_bps = 200.0
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.signal.strong_bps, 200.0);
/// assert_eq!(config.signal.moderate_bps, 75.0);
/// assert_eq!(config.model.recovery_rate, 0.40);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Signal thresholds
    pub signal: SignalSection,
    /// Model parameters
    pub model: ModelSection,
    /// Shock grids
    pub sensitivity: SensitivitySection,
    /// Batch behaviour
    pub batch: BatchSection,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn parse_f64(name: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::EnvError(format!("{}={:?}: {}", name, raw, e)))
}

impl AnalysisConfig {
    /// Create a new AnalysisConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: AnalysisConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override fields from a variable lookup.
    ///
    /// `lookup` maps a variable name from [`env_vars::ALL`] to its value, if
    /// set. Only variables that are present are applied.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_vars::SIGNAL_STRONG_BPS) {
            self.signal.strong_bps = parse_f64(env_vars::SIGNAL_STRONG_BPS, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::SIGNAL_MODERATE_BPS) {
            self.signal.moderate_bps = parse_f64(env_vars::SIGNAL_MODERATE_BPS, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::RISK_FREE_RATE) {
            self.model.risk_free_rate = parse_f64(env_vars::RISK_FREE_RATE, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::HORIZON_YEARS) {
            self.model.horizon_years = parse_f64(env_vars::HORIZON_YEARS, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::RECOVERY_RATE) {
            self.model.recovery_rate = parse_f64(env_vars::RECOVERY_RATE, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::MAX_FAILURE_RATE) {
            self.batch.max_failure_rate = parse_f64(env_vars::MAX_FAILURE_RATE, &raw)?;
        }
        if let Some(raw) = lookup(env_vars::LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&raw)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let SignalSection {
            strong_bps,
            moderate_bps,
        } = self.signal;
        if !strong_bps.is_finite() || !moderate_bps.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "signal",
                reason: format!(
                    "thresholds must be finite (strong={}, moderate={})",
                    strong_bps, moderate_bps
                ),
            });
        }
        if !(strong_bps >= moderate_bps && moderate_bps >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "signal",
                reason: format!(
                    "expected strong >= moderate >= 0 (strong={}, moderate={})",
                    strong_bps, moderate_bps
                ),
            });
        }

        if !self.model.risk_free_rate.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "model.risk_free_rate",
                reason: format!("must be finite, got {}", self.model.risk_free_rate),
            });
        }
        let horizon = self.model.horizon_years;
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "model.horizon_years",
                reason: format!("must be positive and finite, got {}", horizon),
            });
        }
        let recovery = self.model.recovery_rate;
        if !(0.0..=1.0).contains(&recovery) {
            return Err(ConfigError::InvalidValue {
                field: "model.recovery_rate",
                reason: format!("must lie in [0, 1], got {}", recovery),
            });
        }

        let grids = [
            ("sensitivity.volatility_shocks", &self.sensitivity.volatility_shocks),
            ("sensitivity.debt_shocks", &self.sensitivity.debt_shocks),
            ("sensitivity.robustness_shocks", &self.sensitivity.robustness_shocks),
        ];
        for (field, shocks) in grids {
            if let Some(bad) = shocks.iter().find(|s| !s.is_finite()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("shocks must be finite, got {}", bad),
                });
            }
        }

        let rate = self.batch.max_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidValue {
                field: "batch.max_failure_rate",
                reason: format!("must lie in [0, 1], got {}", rate),
            });
        }

        Ok(())
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Config file
/// 3. Default values
pub fn build_config(config_file: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    config.apply_overrides(|name| std::env::var(name).ok())?;

    config.validate()?;
    Ok(config)
}
