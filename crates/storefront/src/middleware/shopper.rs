//! Shopper identity extractors.
//!
//! Authentication happens upstream; the auth proxy asserts the signed-in
//! shopper in the `x-user-id` header. These extractors read it and tag the
//! Sentry scope with the user.

use axum::{extract::FromRequestParts, http::request::Parts};

use lustre_core::UserId;

use crate::error::{AppError, set_sentry_user};

/// The HTTP header carrying the shopper id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a signed-in shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireShopper(user): RequireShopper) -> impl IntoResponse {
///     format!("Hello, {user}!")
/// }
/// ```
pub struct RequireShopper(pub UserId);

impl<S> FromRequestParts<S> for RequireShopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = shopper_from_parts(parts)
            .ok_or_else(|| AppError::Unauthorized("Please sign in to continue".to_string()))?;
        set_sentry_user(&user);
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the shopper.
///
/// Unlike `RequireShopper`, this does not reject anonymous requests.
pub struct OptionalShopper(pub Option<UserId>);

impl<S> FromRequestParts<S> for OptionalShopper
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = shopper_from_parts(parts);
        if let Some(user) = &user {
            set_sentry_user(user);
        }
        Ok(Self(user))
    }
}

pub(crate) fn shopper_from_parts(parts: &Parts) -> Option<UserId> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| UserId::parse(s).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/account");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_require_shopper() {
        let mut with_user = parts(Some(" u-42 "));
        let RequireShopper(user) = RequireShopper::from_request_parts(&mut with_user, &())
            .await
            .unwrap();
        assert_eq!(user.as_str(), "u-42");

        let mut anonymous = parts(None);
        let result = RequireShopper::from_request_parts(&mut anonymous, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        let mut blank = parts(Some("   "));
        let result = RequireShopper::from_request_parts(&mut blank, &()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_optional_shopper() {
        let mut anonymous = parts(None);
        let OptionalShopper(user) = OptionalShopper::from_request_parts(&mut anonymous, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
