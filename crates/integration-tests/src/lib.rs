//! Integration tests for Lustre.
//!
//! The storefront router is exercised in-process against the in-memory
//! backend, so no server or remote service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lustre-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `storefront_home` - Home page composition per view mode
//! - `storefront_search` - Search and filtering
//! - `storefront_catalog` - Product CRUD and health checks
//! - `storefront_account` - Profile, avatar, and address book
//! - `storefront_i18n` - Language switching

#![allow(clippy::missing_panics_doc)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use lustre_storefront::backend::InMemoryBackend;
use lustre_storefront::config::StorefrontConfig;
use lustre_storefront::middleware::shopper::USER_ID_HEADER;
use lustre_storefront::state::AppState;

/// Avatar limit used by test apps.
pub const TEST_UPLOAD_LIMIT: usize = 4 * 1024;

/// Admin bearer key configured on test apps.
pub const TEST_ADMIN_KEY: &str = "t3st-Adm1n!Key#9xQ2vR7zL";

/// A storefront app wired to an in-memory backend.
pub struct TestContext {
    pub state: AppState,
    pub backend: Arc<InMemoryBackend>,
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    /// A warmed-up app over the demo catalog.
    pub async fn demo() -> Self {
        Self::with_backend(InMemoryBackend::demo()).await
    }

    /// A warmed-up app over `backend`.
    pub async fn with_backend(backend: InMemoryBackend) -> Self {
        let config = StorefrontConfig {
            locales_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/locales"),
            admin_key: Some(SecretString::from(TEST_ADMIN_KEY)),
            sync_interval: None,
            max_upload_bytes: TEST_UPLOAD_LIMIT,
            ..StorefrontConfig::default()
        };
        let backend = Arc::new(backend);
        let state = AppState::with_backend(config, backend.clone());
        state.warm_up().await;
        Self { state, backend }
    }

    /// Build a fresh router over the shared state.
    pub fn app(&self) -> Router {
        lustre_storefront::app(self.state.clone())
    }

    /// Send a request with an optional shopper and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let headers: Vec<(&str, &str)> = user.map(|u| (USER_ID_HEADER, u)).into_iter().collect();
        self.send_with_headers(method, uri, &headers, body).await
    }

    /// Send a request carrying the admin key.
    pub async fn send_as_admin(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let bearer = format!("Bearer {TEST_ADMIN_KEY}");
        self.send_with_headers(method, uri, &[("authorization", &bearer)], body)
            .await
    }

    /// Send a request with extra headers and an optional JSON body.
    pub async fn send_with_headers(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.dispatch(request).await
    }

    /// Send a prepared request.
    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse { status, body }
    }

    /// `GET` as an anonymous shopper.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }
}

/// Build a multipart body with one file field.
pub fn multipart_body(
    boundary: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Vec<u8> {
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Ids of the products in a JSON array.
pub fn ids(products: &Value) -> Vec<String> {
    products
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
