//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                              - Home page (?mode=jewellery|gifts&slide=&lang=)
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (catalog loaded)
//!
//! # Catalog
//! GET    /search                        - Search (?q=&category=&collection=&max_price=)
//! GET    /products                      - Product listing
//! POST   /products                      - Create product (admin key)
//! GET    /products/{id}                 - Product detail
//! PUT    /products/{id}                 - Update product (admin key)
//! DELETE /products/{id}                 - Delete product (admin key)
//! GET    /assets                        - Dynamic asset map
//!
//! # Localization
//! GET    /i18n                          - Request language and table (?lang=)
//! PUT    /i18n/language                 - Switch language
//!
//! # Account (requires x-user-id)
//! GET    /account                       - Profile
//! PATCH  /account                       - Update name/phone
//! POST   /account/avatar                - Upload avatar (multipart "file")
//! GET    /account/addresses             - Address list
//! POST   /account/addresses             - Add address
//! PUT    /account/addresses/{id}        - Replace address
//! DELETE /account/addresses/{id}        - Delete address
//! POST   /account/addresses/{id}/default - Make default
//! ```

pub mod account;
pub mod assets;
pub mod health;
pub mod home;
pub mod i18n;
pub mod products;
pub mod search;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Multipart framing allowance on top of the avatar size limit, so oversized
/// images reach the service check and get its message.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the account routes router.
pub fn account_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(account::index).patch(account::update))
        .route(
            "/avatar",
            post(account::upload_avatar).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route("/addresses/{id}/default", post(account::set_default_address))
}

/// Create all routes for the storefront.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // Catalog
        .route("/search", get(search::search))
        .nest("/products", product_routes())
        .route("/assets", get(assets::index))
        // Localization
        .route("/i18n", get(i18n::show))
        .route("/i18n/language", put(i18n::set_language))
        // Account routes
        .nest("/account", account_routes(max_upload_bytes))
}
