//! Admin credential extractor for catalog writes.
//!
//! Catalog writes carry the admin bearer key in the `Authorization` header.
//! The key is compared in constant time against `STOREFRONT_ADMIN_KEY`; when
//! no key is configured every write is refused.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::error::{AppError, add_breadcrumb};
use crate::state::AppState;

/// Extractor that requires the admin bearer key.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_product(_admin: RequireAdmin, Path(id): Path<String>) -> StatusCode {
///     StatusCode::NO_CONTENT
/// }
/// ```
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Admin credentials required".to_string()))?;

        let Some(expected) = &state.config().admin_key else {
            tracing::warn!("Catalog write refused: no admin key configured");
            return Err(AppError::Forbidden(
                "Catalog changes are disabled".to_string(),
            ));
        };

        if !keys_match(token, expected.expose_secret()) {
            tracing::warn!(path = %parts.uri.path(), "Catalog write refused: bad admin key");
            return Err(AppError::Forbidden("Invalid admin credentials".to_string()));
        }

        add_breadcrumb("auth", "Admin key accepted", None);
        Ok(Self)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Compare keys without leaking where they differ.
///
/// Both sides are padded to the same length with different fill bytes, so a
/// length mismatch can never compare equal.
fn keys_match(given: &str, expected: &str) -> bool {
    let len = given.len().max(expected.len());
    let padded = |key: &str, fill: u8| -> Vec<u8> {
        key.bytes().chain(std::iter::repeat(fill)).take(len).collect()
    };

    let lengths_equal = given.len().ct_eq(&expected.len());
    let contents_equal = padded(given, 0x00)
        .as_slice()
        .ct_eq(padded(expected, 0xFF).as_slice());
    (lengths_equal & contents_equal).into()
}
