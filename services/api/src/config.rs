//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;
use url::Url;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Root of the co-op portal, e.g. `https://members.foodcoop.com`.
    pub coop_base_url: Url,
    /// Absolute login page URL, derived from the base and `COOP_LOGIN_PATH`.
    pub coop_login_url: Url,
    pub frontend_url: String,
    pub max_concurrent_sessions: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Database Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Portal Settings ---
        let base_str =
            lookup("COOP_BASE_URL").unwrap_or_else(|| "https://members.foodcoop.com".to_string());
        let coop_base_url = Url::parse(&base_str)
            .map_err(|e| ConfigError::InvalidValue("COOP_BASE_URL".to_string(), e.to_string()))?;

        let login_path =
            lookup("COOP_LOGIN_PATH").unwrap_or_else(|| "/services/login/".to_string());
        let coop_login_url = coop_base_url.join(&login_path).map_err(|e| {
            ConfigError::InvalidValue("COOP_LOGIN_PATH".to_string(), e.to_string())
        })?;

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".to_string());

        let max_concurrent_sessions = match lookup("MAX_CONCURRENT_SESSIONS") {
            None => 1,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "MAX_CONCURRENT_SESSIONS".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    ))
                }
            },
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            coop_base_url,
            coop_login_url,
            frontend_url,
            max_concurrent_sessions,
        })
    }
}
