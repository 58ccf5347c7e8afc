//! Application configuration
//!
//! Every setting comes from a command line flag or its environment variable,
//! with `.env` loaded first.

use std::path::PathBuf;

use clap::Args;
use jiff::tz::TimeZone;
use thiserror::Error;

pub mod api;
pub mod observability;

pub use api::ApiConfig;
pub use observability::{LogFormat, LoggingConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Time zone name not found in the tz database
    #[error("Unknown time zone {name}: {source}")]
    TimeZone {
        /// Configured name
        name: String,
        /// Lookup error
        source: jiff::Error,
    },

    /// Catalog file could not be loaded
    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] baglan::catalog::CatalogError),
}

/// Shop settings
#[derive(Debug, Clone, Args)]
pub struct ShopConfig {
    /// IANA time zone appointments are entered in
    #[arg(long, env = "BAGLAN_TIME_ZONE", default_value = "Europe/Istanbul", global = true)]
    pub time_zone: String,

    /// Catalog YAML file; the built-in catalog is used when omitted
    #[arg(long, env = "BAGLAN_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,
}

impl ShopConfig {
    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not in the tz database.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        TimeZone::get(&self.time_zone).map_err(|source| ConfigError::TimeZone {
            name: self.time_zone.clone(),
            source,
        })
    }

    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or parsed.
    pub fn catalog(&self) -> Result<baglan::catalog::Catalog, ConfigError> {
        let catalog = match &self.catalog {
            Some(path) => baglan::catalog::Catalog::load(path)?,
            None => baglan::catalog::Catalog::builtin()?,
        };

        Ok(catalog)
    }
}

/// All settings shared by every command
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Shop settings.
    #[command(flatten)]
    pub shop: ShopConfig,
}
