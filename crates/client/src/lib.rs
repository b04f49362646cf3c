//! Minimarket backend REST client.
//!
//! One [`ApiClient`] serves both front ends. Every call goes through a single
//! request path that attaches the bearer token when a [`Credential`] is
//! supplied and maps HTTP failures onto [`ApiError`].
//!
//! # Architecture
//!
//! - `reqwest` 0.13 with a per-request timeout
//! - Public catalog and payment methods cached with `moka` (60 s TTL)
//! - Product writes invalidate the catalog cache
//! - Sales go through the [`SalesGateway`] trait so checkout can be tested
//!   without a backend
//!
//! # Example
//!
//! ```rust,ignore
//! use minimarket_client::ApiClient;
//!
//! let client = ApiClient::new(&"http://localhost:8080/api".parse()?, Duration::from_secs(10))?;
//! let products = client.list_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
mod cache;
pub mod catalog;
mod client;
pub mod dashboard;
pub mod payments;
pub mod reports;
pub mod sales;
pub mod status;

pub use auth::{Credential, NewUser};
pub use client::ApiClient;
pub use sales::SalesGateway;
pub use status::BackendStatus;

use thiserror::Error;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The credential was rejected (expired or revoked token).
    #[error("Sesión expirada")]
    Unauthorized,

    /// The credential is valid but its roles do not allow the call.
    #[error("Sin permisos")]
    Forbidden,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message reported by the backend, shown to users verbatim.
        message: String,
    },

    /// Transport failure (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot be used.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the caller should drop its credential and log in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message suitable for end users.
    ///
    /// Backend messages pass through unchanged; transport and parse details
    /// are replaced by a generic text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Tu sesión ha expirado, inicia sesión nuevamente".to_string(),
            Self::Forbidden => {
                "No tienes permisos de administrador para ver este contenido".to_string()
            }
            Self::Backend { message, .. } => message.clone(),
            Self::Http(e) if e.is_timeout() => {
                "El servidor no respondió a tiempo, intenta nuevamente".to_string()
            }
            Self::Http(_) | Self::InvalidUrl(_) => {
                "No se pudo conectar con el servidor".to_string()
            }
            Self::Parse(_) => "Respuesta inesperada del servidor".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_displays_message_verbatim() {
        let err = ApiError::Backend {
            status: 400,
            message: "Stock insuficiente para Arroz".to_string(),
        };
        assert_eq!(err.to_string(), "Stock insuficiente para Arroz");
        assert_eq!(err.user_message(), "Stock insuficiente para Arroz");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Forbidden.is_unauthorized());
        assert_eq!(
            ApiError::Forbidden.user_message(),
            "No tienes permisos de administrador para ver este contenido"
        );
    }
}
