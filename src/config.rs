use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Where thread documents are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Redis(String),
    /// Process memory; everything is lost on exit.
    Memory,
}

impl StoreBackend {
    /// Backend name safe to log; redis URLs may carry credentials.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Redis(_) => "redis",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub site_title: String,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment, after applying any `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to something unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env is normal outside development
        let _ = dotenvy::dotenv();

        Ok(Self {
            bind_addr: parse_addr(&env_or_default("BIND_ADDR", "[::]:3000"))?,
            store: parse_store(&env_or_default("STORE_URL", "redis://localhost:6379"))?,
            site_title: env_or_default("SITE_TITLE", "chanboard"),
            log_level: env_or_default("LOG_LEVEL", "info"),
        })
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|e| ConfigError::InvalidValue {
        name: "BIND_ADDR".to_string(),
        message: format!("{value:?}: {e}"),
    })
}

fn parse_store(value: &str) -> Result<StoreBackend, ConfigError> {
    let scheme = value.split("://").next().unwrap_or_default();
    match scheme {
        "memory" => Ok(StoreBackend::Memory),
        "redis" | "rediss" | "redis+unix" => Ok(StoreBackend::Redis(value.to_string())),
        _ => Err(ConfigError::InvalidValue {
            name: "STORE_URL".to_string(),
            message: format!("unsupported scheme in {value:?}"),
        }),
    }
}
