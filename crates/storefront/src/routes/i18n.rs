//! Localization route handlers.

use std::collections::HashMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::i18n::{Language, LocalizationStore};
use crate::middleware::{OptionalShopper, ShopperLanguage};
use crate::state::AppState;

/// A language and its resolved translation table.
#[derive(Debug, Serialize)]
pub struct LocalizationView {
    pub language: &'static str,
    pub languages: &'static [Language],
    pub table: HashMap<String, String>,
}

impl LocalizationView {
    fn of(store: &LocalizationStore, language: &'static str) -> Self {
        Self {
            language,
            languages: LocalizationStore::languages(),
            table: store.table(language),
        }
    }
}

/// Language change request.
#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

/// Get the request's language and its table.
pub async fn show(
    State(state): State<AppState>,
    ShopperLanguage(language): ShopperLanguage,
) -> Json<LocalizationView> {
    Json(LocalizationView::of(state.i18n(), language))
}

/// Switch language.
///
/// The device keeps the choice and sends it back as `?lang=`. For a
/// signed-in shopper it is also written to their profile; a failed profile
/// write is logged and the device choice still stands.
#[instrument(skip(state, shopper))]
pub async fn set_language(
    State(state): State<AppState>,
    OptionalShopper(shopper): OptionalShopper,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<LocalizationView>> {
    let code = LocalizationStore::resolve(&request.language)?;

    if let Some(user) = shopper
        && let Err(e) = state.profiles().set_language(&user, code).await
    {
        tracing::warn!(user = %user, error = %e, "Failed to store language on profile");
    }

    Ok(Json(LocalizationView::of(state.i18n(), code)))
}
