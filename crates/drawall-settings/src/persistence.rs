//! Loading and saving configuration files
//!
//! The format is chosen from the file extension: `.json` and `.toml` hold the
//! serialized [`PlotterConfig`], anything else is a key/value catalog.

use crate::catalog::{parse_catalog, write_catalog, CatalogReport};
use crate::config::PlotterConfig;
use crate::error::{Result, SettingsError};
use drawall_core::{Error, ErrorCode};
use std::io;
use std::path::Path;

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    /// Line-oriented `key value` catalog
    Catalog,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::Json
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Self::Toml
        } else {
            Self::Catalog
        }
    }
}

/// Load and validate a configuration file.
///
/// Catalog warnings are returned alongside the configuration; JSON and TOML
/// files never produce any.
pub fn load_config(path: &Path) -> Result<CatalogReport> {
    let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;

    let report = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => CatalogReport {
            config: serde_json::from_str(&content)?,
            warnings: Vec::new(),
        },
        ConfigFormat::Toml => CatalogReport {
            config: toml::from_str(&content)?,
            warnings: Vec::new(),
        },
        ConfigFormat::Catalog => parse_catalog(&content)?,
    };

    report.config.validate()?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(report)
}

/// Validate and save a configuration file.
pub fn save_config(config: &PlotterConfig, path: &Path) -> Result<()> {
    config.validate()?;

    let content = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Catalog => write_catalog(config),
    };

    std::fs::write(path, content)
        .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Saved configuration to {}", path.display());
    Ok(())
}

fn read_error(path: &Path, err: io::Error) -> SettingsError {
    let code = if err.kind() == io::ErrorKind::NotFound {
        ErrorCode::FileNotFound
    } else {
        ErrorCode::FileNotReadable
    };
    tracing::error!("Cannot read {}: {}", path.display(), err);
    Error::fatal(code, path.display().to_string()).into()
}
