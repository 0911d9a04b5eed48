//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export STORE_PATH="url-shortener.db"
//! export REDIRECTS_FILE="redirects.yaml"
//! export STORE_FAILURE_POLICY="pass-through"
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `STORE_PATH` - sled store directory (default: `url-shortener.db`)
//! - `REDIRECTS_FILE` - YAML redirect document; the built-in document is used if unset
//! - `STORE_FAILURE_POLICY` - `pass-through` or `bad-gateway` (default: `pass-through`)
//! - `SKIP_SEED` - Skip the bootstrap seeding step (default: `false`)

use crate::application::chain::FailurePolicy;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub store_path: PathBuf,
    /// YAML document for the declarative source. `None` selects the built-in one.
    pub redirects_file: Option<PathBuf>,
    /// What the store layer does when a read fails.
    pub failure_policy: FailurePolicy,
    /// When true, the store is opened as-is without inserting the default entry.
    pub skip_seed: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STORE_FAILURE_POLICY` holds an unknown value.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let store_path = env::var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("url-shortener.db"));

        let redirects_file = env::var("REDIRECTS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let failure_policy = match env::var("STORE_FAILURE_POLICY") {
            Ok(v) => v
                .parse::<FailurePolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid STORE_FAILURE_POLICY")?,
            Err(_) => FailurePolicy::default(),
        };

        let skip_seed = env::var("SKIP_SEED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            store_path,
            redirects_file,
            failure_policy,
            skip_seed,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `store_path` is empty
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.store_path.as_os_str().is_empty() {
            anyhow::bail!("STORE_PATH must not be empty");
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Store: {}", self.store_path.display());

        match &self.redirects_file {
            Some(path) => tracing::info!("  YAML redirects: {}", path.display()),
            None => tracing::info!("  YAML redirects: built-in"),
        }

        tracing::info!("  Store failure policy: {}", self.failure_policy);
        tracing::info!("  Seed on startup: {}", !self.skip_seed);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable holds an invalid value or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
