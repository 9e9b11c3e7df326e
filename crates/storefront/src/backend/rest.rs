//! REST adapter for the remote persistence service.
//!
//! Uses `reqwest` with JSON bodies and a bearer API key.
//!
//! # Endpoints
//!
//! ```text
//! GET    /products
//! POST   /products
//! PATCH  /products/{id}
//! DELETE /products/{id}
//! GET    /assets
//! GET    /users/{id}
//! PATCH  /users/{id}
//! POST   /uploads/product-images   (multipart, field "file")
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use lustre_core::{NewProduct, Product, ProductId, ProductPatch, UserId, UserPatch, UserProfile};

use super::{AssetEntry, Backend, BackendError, ImageUpload};
use crate::config::RestBackendConfig;

/// Maximum number of response body characters kept in logs and errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the remote persistence service.
#[derive(Clone)]
pub struct RestBackend {
    inner: Arc<RestBackendInner>,
}

struct RestBackendInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl RestBackend {
    /// Create a new REST backend client.
    #[must_use]
    pub fn new(config: &RestBackendConfig) -> Self {
        Self {
            inner: Arc::new(RestBackendInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .bearer_auth(&self.inner.api_key)
            .header("User-Agent", "Lustre-Storefront/1.0")
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(excerpt(&body)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Backend returned non-success status"
            );
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and decode a JSON response body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[async_trait]
impl Backend for RestBackend {
    #[instrument(skip(self))]
    async fn get_all_products(&self) -> Result<Vec<Product>, BackendError> {
        let url = self.endpoint(&["products"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products"])?;
        self.send_json(self.request(Method::POST, url).json(product))
            .await
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, BackendError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send_json(self.request(Method::PATCH, url).json(patch))
            .await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_all_assets(&self) -> Result<Vec<AssetEntry>, BackendError> {
        let url = self.endpoint(&["assets"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        let url = self.endpoint(&["users", id.as_str()])?;
        match self.send_json(self.request(Method::GET, url)).await {
            Ok(profile) => Ok(Some(profile)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_user(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<UserProfile, BackendError> {
        let url = self.endpoint(&["users", id.as_str()])?;
        self.send_json(self.request(Method::PATCH, url).json(patch))
            .await
    }

    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    async fn upload_product_image(&self, upload: ImageUpload) -> Result<String, BackendError> {
        let url = self.endpoint(&["uploads", "product-images"])?;
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: UploadResponse = self
            .send_json(self.request(Method::POST, url).multipart(form))
            .await?;
        Ok(response.url)
    }
}
