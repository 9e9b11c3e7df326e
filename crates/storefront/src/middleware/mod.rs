//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Shopper identity is read per handler with the [`RequireShopper`] and
//! [`OptionalShopper`] extractors; catalog writes require [`RequireAdmin`].
//! [`ShopperLanguage`] resolves the language for each request.

pub mod admin;
pub mod language;
pub mod request_id;
pub mod shopper;

pub use admin::RequireAdmin;
pub use language::ShopperLanguage;
pub use request_id::{RequestId, request_id_middleware};
pub use shopper::{OptionalShopper, RequireShopper};
