//! Dynamic visual assets (banner and hero images) keyed by name.
//!
//! The mapping is fetched from the remote service at start-up and on each
//! periodic sync. Views never fail on a missing key: they ask for
//! [`ContentStore::resolve_asset`] with their own fallback URL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::instrument;

use crate::backend::{Backend, BackendError};

/// Cloneable handle to the shared asset mapping.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<ContentStoreInner>,
}

struct ContentStoreInner {
    backend: Arc<dyn Backend>,
    assets: RwLock<HashMap<String, String>>,
}

impl ContentStore {
    /// Create an empty store backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(ContentStoreInner {
                backend,
                assets: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Replace the mapping with the service's current assets.
    ///
    /// Later entries win when the service repeats a key.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous mapping is kept.
    #[instrument(skip(self))]
    pub async fn refresh_assets(&self) -> Result<usize, BackendError> {
        let entries = self.inner.backend.get_all_assets().await?;
        let assets: HashMap<String, String> =
            entries.into_iter().map(|e| (e.key, e.value)).collect();
        let count = assets.len();
        *self
            .inner
            .assets
            .write()
            .unwrap_or_else(PoisonError::into_inner) = assets;
        tracing::debug!(count, "Assets refreshed");
        Ok(count)
    }

    /// URL stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// URL stored under `key`, or `default` when the key is absent or empty.
    #[must_use]
    pub fn resolve_asset(&self, key: &str, default: &str) -> String {
        self.read()
            .get(key)
            .filter(|url| !url.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Copy of the whole mapping.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.inner
            .assets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{AssetEntry, InMemoryBackend};

    fn entry(key: &str, value: &str) -> AssetEntry {
        AssetEntry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_asset_falls_back() {
        let backend = Arc::new(InMemoryBackend::new().with_assets(vec![
            entry("hero_main", "https://cdn/hero.jpg"),
            entry("banner_blank", "  "),
        ]));
        let store = ContentStore::new(backend);
        store.refresh_assets().await.unwrap();

        assert_eq!(
            store.resolve_asset("hero_main", "/fallback.jpg"),
            "https://cdn/hero.jpg"
        );
        assert_eq!(store.resolve_asset("missing", "/fallback.jpg"), "/fallback.jpg");
        assert_eq!(store.resolve_asset("banner_blank", "/fallback.jpg"), "/fallback.jpg");
        assert_eq!(store.get("missing"), None);
    }

    #[tokio::test]
    async fn test_duplicate_keys_last_wins() {
        let backend = Arc::new(InMemoryBackend::new().with_assets(vec![
            entry("k", "first"),
            entry("k", "second"),
        ]));
        let store = ContentStore::new(backend);
        assert_eq!(store.refresh_assets().await.unwrap(), 1);
        assert_eq!(store.get("k").as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_mapping() {
        let backend = Arc::new(InMemoryBackend::new().with_assets(vec![entry("k", "v")]));
        let store = ContentStore::new(backend.clone());
        store.refresh_assets().await.unwrap();

        backend.set_failing(true);
        assert!(store.refresh_assets().await.is_err());
        assert_eq!(store.snapshot().len(), 1);
    }
}
