//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable when the backend is unreachable or
/// reports itself down.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().backend_status().await {
        Ok(status) if status.is_up() => StatusCode::OK,
        Ok(status) => {
            tracing::warn!(status = ?status.status, "Backend reports not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            tracing::warn!(error = %e, "Backend status check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
