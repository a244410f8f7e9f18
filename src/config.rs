//! Environment-driven configuration
//!
//! Read once at startup (after loading `.env` when present). A missing secret or
//! an unparsable number stops the process before any listener is bound.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_HOURS, DEFAULT_REDIS_URL,
    DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Process-wide configuration
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// `LOG_FORMAT=json` switches to JSON lines
    pub log_json: bool,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Backs refresh sessions only
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                host: optional("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parsed_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
                rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                log_json: optional("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
                request_timeout_secs: parsed_or(
                    "REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                )?,
            },
            redis: RedisConfig {
                url: optional("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                expiry_hours: parsed_or("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
                refresh_token_expiry_days: parsed_or(
                    "REFRESH_TOKEN_EXPIRY_DAYS",
                    DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
                )?,
            },
        })
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl JwtConfig {
    /// Refresh session lifetime in seconds
    pub fn refresh_ttl_secs(&self) -> u64 {
        (self.refresh_token_expiry_days * 24 * 60 * 60).max(0) as u64
    }
}

/// Non-empty value of `key`, if set
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
