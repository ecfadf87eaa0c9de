//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NORTHWIND_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `NORTHWIND_POLICY_FILE` - YAML role/action table (default: built-in table)
//! - `NORTHWIND_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `NORTHWIND_LOG_JSON` - Emit JSON logs when set to `1`, `true` or `yes`

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DATABASE_URL_VAR: &str = "NORTHWIND_DATABASE_URL";
const POLICY_FILE_VAR: &str = "NORTHWIND_POLICY_FILE";
const MAX_CONNECTIONS_VAR: &str = "NORTHWIND_DB_MAX_CONNECTIONS";
const LOG_JSON_VAR: &str = "NORTHWIND_LOG_JSON";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Database configuration for commands that need a connection.
///
/// The policy file and log format are read separately by
/// [`policy_file_from_env`] and [`log_json_from_env`], since commands that
/// never touch the database must not require a database URL.
///
/// Implements `Debug` manually to redact the database URL, which carries the
/// password.
#[derive(Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is set.
    /// Returns `ConfigError::InvalidEnvVar` if the pool size is not a positive
    /// integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url(DATABASE_URL_VAR)?;

        Ok(Self {
            database_url,
            max_connections: parse_max_connections(&get_env_or_default(
                MAX_CONNECTIONS_VAR,
                &DEFAULT_MAX_CONNECTIONS.to_string(),
            ))?,
        })
    }
}

/// The configured policy file, read without requiring a database URL.
#[must_use]
pub fn policy_file_from_env() -> Option<PathBuf> {
    get_optional_env(POLICY_FILE_VAR)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

/// Whether JSON logging is requested, read before the rest of the configuration.
#[must_use]
pub fn log_json_from_env() -> bool {
    get_optional_env(LOG_JSON_VAR).is_some_and(|value| parse_flag(&value))
}

// =============================================================================
// Helpers
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_max_connections(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            MAX_CONNECTIONS_VAR.to_string(),
            "must be at least 1".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            MAX_CONNECTIONS_VAR.to_string(),
            e.to_string(),
        )),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
