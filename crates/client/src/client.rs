//! Shared request path for all backend calls.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::ApiError;
use crate::auth::Credential;
use crate::cache::{CacheKey, CacheValue};

/// How long public catalog data stays cached.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Longest backend body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the minimarket REST API.
///
/// Cheap to clone; clones share the connection pool and caches.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

/// Error body shape used by the backend.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    mensaje: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for non-HTTP URLs and
    /// [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// The API base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub(crate) fn cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.cache
    }

    /// Start a request to `path` (relative to the base URL).
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.http.request(method, url);
        match credential {
            Some(credential) => builder.bearer_auth(credential.token()),
            None => builder,
        }
    }

    /// Send a request and map non-success statuses to [`ApiError`].
    ///
    /// On an authenticated request a 401 means the credential is no longer
    /// valid and a 403 means its roles do not cover the call.
    pub(crate) async fn execute(
        &self,
        builder: RequestBuilder,
        authenticated: bool,
    ) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if authenticated && status == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "Backend rejected credential");
            return Err(ApiError::Unauthorized);
        }

        if authenticated && status == StatusCode::FORBIDDEN {
            tracing::warn!(url = %response.url(), "Backend denied access for this role");
            return Err(ApiError::Forbidden);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            url = %url,
            body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Backend returned non-success status"
        );

        Err(ApiError::Backend {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder, authenticated).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Pick the most useful message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed
            .message
            .or(parsed.mensaje)
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
    {
        return message;
    }

    let text = body.trim();
    if !text.is_empty() && !text.starts_with('{') && !text.starts_with('<') {
        return text.chars().take(200).collect();
    }

    match status.canonical_reason() {
        Some(reason) => format!("Error del servidor ({} {reason})", status.as_u16()),
        None => format!("Error del servidor ({})", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"Stock insuficiente"}"#),
            "Stock insuficiente"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"mensaje":"Producto no existe"}"#),
            "Producto no existe"
        );
    }

    #[test]
    fn test_error_message_plain_text_body() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, "Usuario ya existe"),
            "Usuario ya existe"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Error del servidor (500 Internal Server Error)"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"timestamp":"x"}"#),
            "Error del servidor (502 Bad Gateway)"
        );
    }
}
