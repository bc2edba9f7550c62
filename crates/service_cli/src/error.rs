//! CLI error types

use infra_config::ConfigError;
use merton_core::types::InputError;
use merton_risk::SettingsError;
use thiserror::Error;

/// CLI result type
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration loaded but not usable by the model
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    /// Firm inputs rejected by validation
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
