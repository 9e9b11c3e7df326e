//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check: ready once the catalog has loaded.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.catalog().is_loaded() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "catalog not loaded")
    }
}
