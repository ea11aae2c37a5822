//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness: the process is up. Does not check the store API.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness: 200 when the store API answers, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Store API not reachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
