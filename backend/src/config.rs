//! Application configuration.
//!
//! Values come from the process environment, after an optional `.env` file
//! has been loaded with `dotenvy`. Every variable has a default, so an empty
//! environment starts a local development server.
//!
//! | Variable | Default |
//! |---|---|
//! | `CONTACTS_DATABASE_URL` | `sqlite:contacts.db` |
//! | `CONTACTS_BIND_ADDR` | `127.0.0.1:3000` |
//! | `CONTACTS_LOG` | `info` |
//! | `CONTACTS_CORS_ORIGIN` | `http://localhost:8080` |

use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;

pub const DATABASE_URL_VAR: &str = "CONTACTS_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "CONTACTS_BIND_ADDR";
pub const LOG_VAR: &str = "CONTACTS_LOG";
pub const CORS_ORIGIN_VAR: &str = "CONTACTS_CORS_ORIGIN";

const DEFAULT_DATABASE_URL: &str = "sqlite:contacts.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG: &str = "info";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Settings needed to start the backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL, e.g. `sqlite:contacts.db`
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Single origin allowed by CORS
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    /// Load from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = value(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: BIND_ADDR_VAR,
                message: format!("'{}' is not a socket address: {}", bind_addr, e),
            })?;

        let cors_origin = value(CORS_ORIGIN_VAR, DEFAULT_CORS_ORIGIN);
        let cors_origin = cors_origin
            .parse::<HeaderValue>()
            .map_err(|e| ConfigError::InvalidValue {
                key: CORS_ORIGIN_VAR,
                message: format!("'{}' is not a valid origin: {}", cors_origin, e),
            })?;

        let database_url = value(DATABASE_URL_VAR, DEFAULT_DATABASE_URL);
        if database_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: DATABASE_URL_VAR,
                message: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr,
            log_filter: value(LOG_VAR, DEFAULT_LOG),
            cors_origin,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: DEFAULT_LOG.to_string(),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
        }
    }
}
