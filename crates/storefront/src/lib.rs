//! Lustre Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`backend`] - The remote service port and its REST/in-memory adapters
//! - [`catalog`] - Product store kept in sync with the service
//! - [`content`] - Dynamic asset map
//! - [`i18n`] - Language selection and translation tables
//! - [`search`] - Search and filtering over the merged catalog
//! - [`merchandising`] - Home page composition per view mode
//! - [`profile`] - Profile and address book operations
//! - [`schedule`] - Periodic tasks, countdowns, and carousels
//! - [`routes`] - JSON HTTP handlers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod merchandising;
pub mod middleware;
pub mod profile;
pub mod routes;
pub mod schedule;
pub mod search;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes;
    routes::routes(max_upload_bytes)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
