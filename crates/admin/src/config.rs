//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin console
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_STATIC_DIR` - Static assets directory (default: crates/admin/static)
//! - `MINIMARKET_API_URL` - Backend API root (default: <http://localhost:8080/api>)
//! - `MINIMARKET_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default backend API root.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin console
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Backend API root
    pub api_url: Url,
    /// Per-request backend timeout
    pub api_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = parse_env("ADMIN_HOST", "127.0.0.1")?;
        let port = parse_env("ADMIN_PORT", "3001")?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        let static_dir = PathBuf::from(get_env_or_default(
            "ADMIN_STATIC_DIR",
            "crates/admin/static",
        ));
        let api_url = parse_api_url(
            "MINIMARKET_API_URL",
            &get_env_or_default("MINIMARKET_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_secs: u64 = parse_env("MINIMARKET_API_TIMEOUT_SECS", "10")?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            api_url,
            api_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: std::env::var("SENTRY_DSN")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute `http`/`https` URL.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "https://admin.minimarket.pe".to_string(),
            static_dir: PathBuf::from("static"),
            api_url: Url::parse(DEFAULT_API_URL).unwrap(),
            api_timeout: Duration::from_secs(10),
            sentry_dsn: Some(SecretString::from("https://key@sentry.example.com/1")),
            sentry_environment: None,
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("key@sentry"));
        assert_eq!(
            config.sentry_dsn.as_ref().unwrap().expose_secret(),
            "https://key@sentry.example.com/1"
        );
        assert!(config.is_secure());
        assert_eq!(config.socket_addr().port(), 3001);
    }

    #[test]
    fn test_parse_api_url_rejects_relative() {
        assert!(parse_api_url("K", "http://localhost:8080/api").is_ok());
        assert!(parse_api_url("K", "/api").is_err());
        assert!(parse_api_url("K", "ws://localhost").is_err());
    }
}
