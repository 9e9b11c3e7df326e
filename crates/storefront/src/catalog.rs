//! Product store: the in-memory catalog snapshot.
//!
//! The remote service is the source of truth. Every write goes to the
//! service first and the local snapshot changes only after it succeeds, so a
//! failed call never leaves the storefront showing something the service
//! does not have.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::instrument;

use lustre_core::{NewProduct, Product, ProductError, ProductId, ProductPatch};

use crate::backend::{Backend, BackendError};

/// Errors from product store operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id in the catalog.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The payload breaks a catalog rule.
    #[error(transparent)]
    Invalid(#[from] ProductError),

    /// An update that changes nothing.
    #[error("Nothing to update")]
    EmptyPatch,

    /// The remote service call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Cloneable handle to the shared catalog snapshot.
#[derive(Clone)]
pub struct ProductStore {
    inner: Arc<ProductStoreInner>,
}

struct ProductStoreInner {
    backend: Arc<dyn Backend>,
    products: RwLock<Vec<Product>>,
    loaded: AtomicBool,
}

impl ProductStore {
    /// Create an empty store backed by `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(ProductStoreInner {
                backend,
                products: RwLock::new(Vec::new()),
                loaded: AtomicBool::new(false),
            }),
        }
    }

    /// Current snapshot of the catalog, in service order.
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        self.read().clone()
    }

    /// Look up one product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.read().iter().find(|p| p.id == *id).cloned()
    }

    /// Returns `true` once a refresh has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::Acquire)
    }

    /// Replace the snapshot with the service's full catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Backend` if the fetch fails; the previous
    /// snapshot is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let products = self.inner.backend.get_all_products().await?;
        let count = products.len();
        *self.write() = products;
        self.inner.loaded.store(true, Ordering::Release);
        tracing::debug!(count, "Catalog refreshed");
        Ok(count)
    }

    /// Create a product.
    ///
    /// On success the product is appended locally and a full refresh is
    /// scheduled in the background to pick up any server-side changes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` before any remote call if the payload
    /// breaks a catalog rule, or `CatalogError::Backend` if the service
    /// rejects it.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewProduct) -> Result<Product, CatalogError> {
        new.validate()?;
        let created = self.inner.backend.create_product(new).await?;
        upsert(&mut self.write(), created.clone());
        tracing::info!(id = %created.id, "Product created");

        let store = self.clone();
        tokio::spawn(async move {
            if let Err(e) = store.refresh().await {
                tracing::warn!(error = %e, "Background catalog refresh failed");
            }
        });

        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// The patch is checked against the local copy first; the record
    /// returned by the service replaces the local one.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPatch`, `NotFound` or `Invalid` without calling the
    /// service, or `Backend` if the remote update fails.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, CatalogError> {
        if patch.is_empty() {
            return Err(CatalogError::EmptyPatch);
        }
        let current = self
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        patch.apply_to(&current)?;

        let updated = self.inner.backend.update_product(id, patch).await?;
        upsert(&mut self.write(), updated.clone());
        tracing::info!(id = %id, "Product updated");
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// The remote delete runs first; the local entry is removed only if it
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the service has no such product, or `Backend`
    /// if the remote delete fails. The snapshot is unchanged in both cases.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), CatalogError> {
        self.inner
            .backend
            .delete_product(id)
            .await
            .map_err(|e| match e {
                BackendError::NotFound(_) => CatalogError::NotFound(id.clone()),
                other => CatalogError::Backend(other),
            })?;
        self.write().retain(|p| p.id != *id);
        tracing::info!(id = %id, "Product deleted");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Replace the product with the same id, or append it.
fn upsert(products: &mut Vec<Product>, product: Product) {
    match products.iter_mut().find(|p| p.id == product.id) {
        Some(slot) => *slot = product,
        None => products.push(product),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lustre_core::{Category, Price};

    use super::*;
    use crate::backend::InMemoryBackend;

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: Category::Rings,
            price: Price::from_rupees(price),
            original_price: None,
            image: String::new(),
            description: None,
            specs: Vec::new(),
            in_stock: true,
            on_discount: false,
        }
    }

    async fn loaded_store() -> (Arc<InMemoryBackend>, ProductStore) {
        let backend = Arc::new(
            InMemoryBackend::new().with_products(vec![product("p1", 500), product("p2", 900)]),
        );
        let store = ProductStore::new(backend.clone());
        store.refresh().await.unwrap();
        (backend, store)
    }

    #[tokio::test]
    async fn test_refresh_loads_snapshot() {
        let (_, store) = loaded_store().await;
        assert!(store.is_loaded());
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.get(&ProductId::new("p2")).unwrap().name, "Product p2");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let (backend, store) = loaded_store().await;
        backend.set_failing(true);
        assert!(store.refresh().await.is_err());
        assert_eq!(store.list().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_catalog_unchanged() {
        let (backend, store) = loaded_store().await;
        let before = store.list();
        backend.set_failing(true);

        let err = store.delete(&ProductId::new("p1")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Backend(_)));
        assert_eq!(store.list(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_after_remote_success() {
        let (backend, store) = loaded_store().await;
        store.delete(&ProductId::new("p1")).await.unwrap();
        assert!(store.get(&ProductId::new("p1")).is_none());
        assert_eq!(backend.products().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (_, store) = loaded_store().await;
        let err = store.delete(&ProductId::new("nope")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_appends_locally() {
        let (backend, store) = loaded_store().await;
        let new = NewProduct {
            name: "Emerald Band".to_string(),
            category: Category::Rings,
            price: Price::from_rupees(12_000),
            original_price: None,
            image: String::new(),
            description: None,
            specs: Vec::new(),
            in_stock: true,
            on_discount: false,
        };
        let created = store.create(&new).await.unwrap();
        assert_eq!(store.get(&created.id).unwrap().name, "Emerald Band");
        assert_eq!(backend.products().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_catalog_unchanged() {
        let (backend, store) = loaded_store().await;
        backend.set_failing(true);
        let new = NewProduct {
            name: "Emerald Band".to_string(),
            category: Category::Rings,
            price: Price::from_rupees(12_000),
            original_price: None,
            image: String::new(),
            description: None,
            specs: Vec::new(),
            in_stock: true,
            on_discount: false,
        };
        assert!(store.create(&new).await.is_err());
        assert_eq!(store.list().len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_returned_record() {
        let (_, store) = loaded_store().await;
        let patch = ProductPatch {
            price: Some(Price::from_rupees(450)),
            ..ProductPatch::default()
        };
        let updated = store.update(&ProductId::new("p1"), &patch).await.unwrap();
        assert_eq!(updated.price, Price::from_rupees(450));
        assert_eq!(
            store.get(&ProductId::new("p1")).unwrap().price,
            Price::from_rupees(450)
        );
    }

    #[tokio::test]
    async fn test_update_rejected_locally_without_remote_call() {
        let (backend, store) = loaded_store().await;
        let calls = backend.call_count();

        let patch = ProductPatch {
            original_price: Some(Price::from_rupees(100)),
            ..ProductPatch::default()
        };
        let err = store
            .update(&ProductId::new("p1"), &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));

        let err = store
            .update(&ProductId::new("p1"), &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPatch));
        assert_eq!(backend.call_count(), calls);
    }
}
