//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PIXELSHELF_DATA_DIR` - Directory holding the persisted cart (default: .pixelshelf)
//! - `PIXELSHELF_CATALOG` - Path to the catalog JSON file (default: data/catalog.json)
//! - `PIXELSHELF_CURRENCY` - Display currency (default: USD)
//! - `PIXELSHELF_CATALOG_RETRIES` - Catalog fetch retries (default: 3)
//! - `PIXELSHELF_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: info)
//!
//! Each invocation loads the catalog once, so the loader's stale time is left
//! at its default here; it only matters to long-lived embedders.

use std::path::PathBuf;
use std::str::FromStr;

use pixelshelf_cart::LoaderOptions;
use pixelshelf_core::CurrencyCode;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected text or json, got {s}")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory used as the local key-value store
    pub data_dir: PathBuf,
    /// Catalog JSON file
    pub catalog_path: PathBuf,
    /// Currency used to format prices
    pub currency: CurrencyCode,
    /// Retries after a failed catalog fetch
    pub catalog_retries: u32,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            data_dir: PathBuf::from(get_env_or_default("PIXELSHELF_DATA_DIR", ".pixelshelf")),
            catalog_path: PathBuf::from(get_env_or_default(
                "PIXELSHELF_CATALOG",
                "data/catalog.json",
            )),
            currency: parse_env("PIXELSHELF_CURRENCY", "USD")?,
            catalog_retries: parse_env("PIXELSHELF_CATALOG_RETRIES", "3")?,
            log_format: parse_env("PIXELSHELF_LOG_FORMAT", "text")?,
        })
    }

    /// Catalog fetch policy derived from this configuration.
    #[must_use]
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            retries: self.catalog_retries,
            ..LoaderOptions::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
