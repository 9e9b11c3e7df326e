//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{Backend, InMemoryBackend, RestBackend};
use crate::catalog::ProductStore;
use crate::config::{BackendConfig, StorefrontConfig};
use crate::content::ContentStore;
use crate::i18n::LocalizationStore;
use crate::profile::ProfileService;
use crate::schedule::PeriodicTask;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers the stores
/// and services explicitly instead of through globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: ProductStore,
    content: ContentStore,
    i18n: LocalizationStore,
    profiles: ProfileService,
}

impl AppState {
    /// Create state using the backend named in the configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend: Arc<dyn Backend> = match &config.backend {
            BackendConfig::Rest(rest) => Arc::new(RestBackend::new(rest)),
            BackendConfig::Memory => Arc::new(InMemoryBackend::demo()),
        };
        Self::with_backend(config, backend)
    }

    /// Create state around an explicit backend.
    #[must_use]
    pub fn with_backend(config: StorefrontConfig, backend: Arc<dyn Backend>) -> Self {
        let catalog = ProductStore::new(backend.clone());
        let content = ContentStore::new(backend.clone());
        let i18n = LocalizationStore::load(&config.locales_dir);
        let profiles = ProfileService::new(backend, config.max_upload_bytes);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                content,
                i18n,
                profiles,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn catalog(&self) -> &ProductStore {
        &self.inner.catalog
    }

    /// Get a reference to the asset store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get a reference to the localization store.
    #[must_use]
    pub fn i18n(&self) -> &LocalizationStore {
        &self.inner.i18n
    }

    /// Get a reference to the profile service.
    #[must_use]
    pub fn profiles(&self) -> &ProfileService {
        &self.inner.profiles
    }

    /// Load the catalog and assets once.
    ///
    /// Failures are logged; the storefront starts with empty snapshots and
    /// the periodic sync retries.
    pub async fn warm_up(&self) {
        let (products, assets) =
            tokio::join!(self.catalog().refresh(), self.content().refresh_assets());

        match products {
            Ok(count) => tracing::info!(count, "Catalog loaded"),
            Err(e) => tracing::error!(error = %e, "Initial catalog load failed"),
        }
        match assets {
            Ok(count) => tracing::info!(count, "Assets loaded"),
            Err(e) => tracing::error!(error = %e, "Initial asset load failed"),
        }
    }

    /// Start the periodic catalog and asset resync, if enabled.
    #[must_use]
    pub fn start_catalog_sync(&self) -> Option<PeriodicTask> {
        let period = self.config().sync_interval?;
        let state = self.clone();
        Some(PeriodicTask::spawn("catalog-sync", period, move || {
            let state = state.clone();
            async move {
                if let Err(e) = state.catalog().refresh().await {
                    tracing::warn!(error = %e, "Catalog sync failed");
                }
                if let Err(e) = state.content().refresh_assets().await {
                    tracing::warn!(error = %e, "Asset sync failed");
                }
            }
        }))
    }
}
