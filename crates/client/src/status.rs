//! Backend status probe.

use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use crate::{ApiClient, ApiError};

/// Payload of `/public/status`.
///
/// Only the fields used for readiness are typed; the rest is kept verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl BackendStatus {
    /// Whether the backend reports itself as up.
    ///
    /// A missing `status` field counts as up since the endpoint answered.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|s| matches!(s.to_ascii_uppercase().as_str(), "UP" | "OK" | "ONLINE"))
    }
}

impl ApiClient {
    /// Probe the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with an
    /// error status.
    #[instrument(skip(self))]
    pub async fn backend_status(&self) -> Result<BackendStatus, ApiError> {
        let builder = self.request(Method::GET, "/public/status", None);
        self.execute_json(builder, false).await
    }
}
