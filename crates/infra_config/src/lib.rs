//! # Infra Config
//!
//! Ambient plumbing shared by the Merton signal engine:
//!
//! - [`AnalysisConfig`]: thresholds, model parameters, shock grids and batch
//!   settings, loaded from defaults, a TOML file and `MERTON_*` variables
//! - [`init_tracing`]: `tracing-subscriber` setup honouring `RUST_LOG`
//!
//! Configuration is returned by value and passed explicitly; nothing here
//! holds global state apart from the tracing subscriber itself.
//!
//! ## Example
//!
//! ```
//! use infra_config::{AnalysisConfig, LogLevel};
//!
//! let config = AnalysisConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.log_level, LogLevel::Info);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub use config::{
    build_config, env_vars, AnalysisConfig, BatchSection, ConfigError, LogLevel, ModelSection,
    SensitivitySection, SignalSection,
};
pub use logging::init_tracing;
