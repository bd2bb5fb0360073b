//! Error types for the settings crate.

use thiserror::Error;

/// Errors that can occur while loading, saving or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The configuration file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// A configuration validation error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A condition that halts the plotter (missing or duplicated entries,
    /// span too short).
    #[error(transparent)]
    Fatal(#[from] drawall_core::Error),
}

impl SettingsError {
    /// Status code to report to the visualizer, if this error carries one.
    pub fn code(&self) -> Option<drawall_core::ErrorCode> {
        match self {
            Self::Fatal(err) => err.code(),
            _ => None,
        }
    }
}

/// Errors related to configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is out of valid range.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
