//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Responses are JSON `{"message": "..."}`. Validation failures carry the
//! shopper-correctable message; failures of the remote service are reported
//! with a generic retry message so internals never leak.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use lustre_core::AddressBookError;

use crate::backend::BackendError;
use crate::catalog::CatalogError;
use crate::i18n::LocalizationError;
use crate::profile::ProfileError;

/// Message shown when the remote service failed.
pub const RETRY_MESSAGE: &str = "Something went wrong, please try again";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product store operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Profile or address book operation failed.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Language selection failed.
    #[error("Localization error: {0}")]
    Localization(#[from] LocalizationError),

    /// Direct backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// No identity or credentials on the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials present but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Invalid(_) | CatalogError::EmptyPatch => StatusCode::BAD_REQUEST,
                CatalogError::Backend(err) => backend_status(err),
            },
            Self::Profile(err) => match err {
                ProfileError::Addresses(AddressBookError::Full { .. }) => StatusCode::CONFLICT,
                ProfileError::Addresses(AddressBookError::NotFound(_)) => StatusCode::NOT_FOUND,
                ProfileError::Addresses(AddressBookError::Invalid(_))
                | ProfileError::InvalidDetails(_) => StatusCode::BAD_REQUEST,
                ProfileError::AvatarTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                ProfileError::UnsupportedImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ProfileError::Backend(err) => backend_status(err),
            },
            Self::Localization(err) => match err {
                LocalizationError::UnknownLanguage(_) => StatusCode::BAD_REQUEST,
                LocalizationError::Io(_) | LocalizationError::Parse { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Backend(err) => backend_status(err),
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the shopper.
    #[must_use]
    pub fn public_message(&self) -> String {
        let status = self.status();
        if status == StatusCode::BAD_GATEWAY {
            return RETRY_MESSAGE.to_string();
        }
        if status.is_server_error() {
            return "Internal server error".to_string();
        }
        match self {
            Self::Catalog(CatalogError::Backend(_))
            | Self::Profile(ProfileError::Backend(_))
            | Self::Backend(_) => "Not found".to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::Profile(err) => err.to_string(),
            Self::Localization(err) => err.to_string(),
            Self::Unauthorized(message) | Self::Forbidden(message) | Self::BadRequest(message) => {
                message.clone()
            }
        }
    }
}

/// Remote "not found" is the caller's problem; everything else is a gateway failure.
const fn backend_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorBody {
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("catalog", "Deleted product", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use lustre_core::{AddressError, ProductId};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Forbidden("not an admin".to_string());
        assert_eq!(err.to_string(), "Forbidden: not an admin");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_validation_status_codes() {
        assert_eq!(
            get_status(AppError::Profile(ProfileError::Addresses(
                AddressBookError::Full { max: 3 }
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Profile(ProfileError::Addresses(
                AddressBookError::Invalid(AddressError::InvalidCity)
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Profile(ProfileError::AvatarTooLarge {
                size: 6_000_000,
                max: 5_242_880,
            })),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::NotFound(ProductId::new(
                "p1"
            )))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_backend_failures_hide_details() {
        let err = AppError::Catalog(CatalogError::Backend(BackendError::Unavailable(
            "connection refused to 10.0.0.4".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), RETRY_MESSAGE);

        let err = AppError::Localization(LocalizationError::Io(std::io::Error::other(
            "/srv/lustre/locales: permission denied",
        )));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_client_error_message_has_no_prefix() {
        let err = AppError::Unauthorized("Please sign in to continue".to_string());
        assert_eq!(err.public_message(), "Please sign in to continue");

        let err = AppError::BadRequest("Invalid id".to_string());
        assert_eq!(err.public_message(), "Invalid id");
    }

    #[test]
    fn test_validation_message_is_shown() {
        let err = AppError::Profile(ProfileError::Addresses(AddressBookError::Invalid(
            AddressError::InvalidZip { len: 6 },
        )));
        assert_eq!(err.public_message(), AddressError::InvalidZip { len: 6 }.to_string());
    }
}
