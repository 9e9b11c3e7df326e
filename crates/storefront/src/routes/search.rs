//! Search route handler.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::instrument;

use crate::error::Result;
use crate::search::{self, SearchQuery, SearchResults};
use crate::state::AppState;

/// Search the merged catalog.
///
/// An empty result is a normal response with `isEmpty: true`. A malformed
/// query string (e.g. a non-numeric `max_price`) is a 400.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>> {
    let Query(query) = query?;
    let catalog = state.catalog().list();
    Ok(Json(search::search(&catalog, &query)))
}
