//! Per-request language resolution.
//!
//! The language comes from, in order:
//!
//! 1. `?lang=` on the request (the device's saved choice)
//! 2. the signed-in shopper's profile
//! 3. the `Accept-Language` header
//! 4. [`DEFAULT_LANGUAGE`]
//!
//! Unknown codes at any step are skipped, never rejected.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;

use crate::i18n::{DEFAULT_LANGUAGE, LocalizationStore, negotiate};
use crate::middleware::shopper::shopper_from_parts;
use crate::state::AppState;

/// The language to render this request in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopperLanguage(pub &'static str);

#[derive(Debug, Default, Deserialize)]
struct LanguageParam {
    #[serde(default)]
    lang: Option<String>,
}

impl FromRequestParts<AppState> for ShopperLanguage {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(code) = requested_language(parts) {
            return Ok(Self(code));
        }

        if let Some(user) = shopper_from_parts(parts) {
            match state.profiles().profile(&user).await {
                Ok(profile) => {
                    if let Some(code) = profile
                        .language
                        .as_deref()
                        .and_then(|code| LocalizationStore::resolve(code).ok())
                    {
                        return Ok(Self(code));
                    }
                }
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "Failed to load profile language");
                }
            }
        }

        let negotiated = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|h| h.to_str().ok())
            .and_then(negotiate);
        Ok(Self(negotiated.unwrap_or(DEFAULT_LANGUAGE)))
    }
}

fn requested_language(parts: &Parts) -> Option<&'static str> {
    let Query(param) = Query::<LanguageParam>::try_from_uri(&parts.uri).ok()?;
    let code = param.lang?;
    let resolved = LocalizationStore::resolve(&code).ok();
    if resolved.is_none() {
        tracing::debug!(lang = %code, "Ignoring unknown lang parameter");
    }
    resolved
}
