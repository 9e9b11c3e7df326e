//! Dynamic asset route handler.

use std::collections::HashMap;

use axum::{Json, extract::State};

use crate::state::AppState;

/// Current key to URL asset mapping.
pub async fn index(State(state): State<AppState>) -> Json<HashMap<String, String>> {
    Json(state.content().snapshot())
}
