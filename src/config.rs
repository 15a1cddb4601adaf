//! Configuration loader for the `agrisense-backend` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Base URL of the Firebase realtime database.
    pub firebase_url: String,

    /// Optional database secret sent as the `auth` query parameter.
    pub firebase_auth_token: Option<String>,

    /// Directory holding the pre-trained model artifacts.
    pub models_dir: PathBuf,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
/// - `FIREBASE_DB_URL` – realtime database base URL
/// - `ML_MODELS_DIR` – directory holding the model artifacts
///
/// Optional:
/// - `FIREBASE_AUTH_TOKEN` – database secret (unauthenticated when unset)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let firebase_url = require_env!("FIREBASE_DB_URL");
    let models_dir = PathBuf::from(require_env!("ML_MODELS_DIR"));
    let firebase_auth_token = env::var("FIREBASE_AUTH_TOKEN").ok();
    let db_pool_max = parse_env_u32!("DB_POOL_MAX", 5);

    Ok(Config {
        db_url,
        db_pool_max,
        firebase_url,
        firebase_auth_token,
        models_dir,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks sensitive information like database passwords and the Firebase
    /// auth token while showing all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        // Mask the password in the database URL for security
        let masked_db_url = if let Some(at_pos) = self.db_url.rfind('@') {
            if let Some(colon_pos) = self.db_url[..at_pos].rfind(':') {
                format!(
                    "{}:****{}",
                    &self.db_url[..colon_pos],
                    &self.db_url[at_pos..]
                )
            } else {
                self.db_url.clone()
            }
        } else {
            self.db_url.clone()
        };

        let masked_token = match &self.firebase_auth_token {
            Some(_) => "****",
            None => "(unset)",
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL        : {}", masked_db_url);
        tracing::info!("  FIREBASE_DB_URL     : {}", self.firebase_url);
        tracing::info!("  FIREBASE_AUTH_TOKEN : {}", masked_token);
        tracing::info!("  ML_MODELS_DIR       : {}", self.models_dir.display());
        tracing::info!("  DB_POOL_MAX         : {}", self.db_pool_max);
    }
}
