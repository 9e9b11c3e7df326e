//! Port to the remote persistence, asset, and upload services.
//!
//! # Architecture
//!
//! - The remote service is the source of truth for products, assets, and
//!   shopper profiles; the storefront only keeps in-memory snapshots
//! - Every store talks to it through the [`Backend`] trait so the binary can
//!   run against the REST service or an in-memory stand-in
//! - No retry or backoff: a failed call surfaces to the caller
//!
//! # Adapters
//!
//! - [`RestBackend`] - JSON over HTTP with a bearer API key
//! - [`InMemoryBackend`] - local development and tests, with failure injection

mod memory;
mod rest;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lustre_core::{NewProduct, Product, ProductId, ProductPatch, UserId, UserPatch, UserProfile};

/// Errors that can occur when calling the remote services.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The service answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The service could not be reached or refused to serve.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// One entry of the dynamic asset mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub key: String,
    pub value: String,
}

/// An image file to store with the upload service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Operations the storefront consumes from the remote services.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full product catalog.
    async fn get_all_products(&self) -> Result<Vec<Product>, BackendError>;

    /// Store a new product and return it with its assigned id.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError>;

    /// Merge a patch into a stored product and return the result.
    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, BackendError>;

    /// Delete a product.
    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError>;

    /// Fetch the key→URL asset mapping.
    async fn get_all_assets(&self) -> Result<Vec<AssetEntry>, BackendError>;

    /// Fetch a shopper profile; `None` if the service has no record.
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError>;

    /// Apply a patch to a shopper profile and return the stored result.
    async fn update_user(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<UserProfile, BackendError>;

    /// Store an image and return its public URL.
    async fn upload_product_image(&self, upload: ImageUpload) -> Result<String, BackendError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("product p1".to_string());
        assert_eq!(err.to_string(), "Not found: product p1");

        let err = BackendError::Rejected {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "Request rejected (403): forbidden");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = BackendError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_asset_entry_wire_format() {
        let entry: AssetEntry =
            serde_json::from_str(r#"{"key":"hero_main","value":"https://cdn/x.jpg"}"#).unwrap();
        assert_eq!(entry.key, "hero_main");
        assert_eq!(entry.value, "https://cdn/x.jpg");
    }
}
