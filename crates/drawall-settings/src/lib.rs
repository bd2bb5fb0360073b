//! # Drawall Settings
//!
//! The plotter configuration: the typed [`PlotterConfig`], the line-oriented
//! key/value catalog read from the storage card, and JSON/TOML persistence.

pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;

pub use catalog::{
    parse_catalog, write_catalog, CatalogReport, CatalogWarning, CATALOG_KEYS, MAX_LINE_LENGTH,
};
pub use config::PlotterConfig;
pub use error::{ConfigError, Result, SettingsError};
pub use persistence::{load_config, save_config, ConfigFormat};
