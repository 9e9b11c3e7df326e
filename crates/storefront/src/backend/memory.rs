//! In-memory stand-in for the remote services.
//!
//! Used when `STOREFRONT_BACKEND=memory` and throughout the tests. Calls can
//! be made to fail on demand with [`InMemoryBackend::set_failing`] to exercise
//! the error paths of the stores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use lustre_core::{
    Category, NewProduct, Price, Product, ProductId, ProductPatch, UserId, UserPatch, UserProfile,
};

use super::{AssetEntry, Backend, BackendError, ImageUpload};

#[derive(Default)]
struct MemoryState {
    products: Vec<Product>,
    assets: Vec<AssetEntry>,
    users: HashMap<UserId, UserProfile>,
    uploads: Vec<ImageUpload>,
}

/// Backend that keeps everything in process memory.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-loaded with a small demo catalog and asset map.
    #[must_use]
    pub fn demo() -> Self {
        let products = vec![
            demo_product("cat-ring-1", "Classic Solitaire Ring", Category::Rings, 18_500, Some(22_000)),
            demo_product("cat-neck-1", "Pearl Drop Necklace", Category::Necklaces, 9_800, None),
            demo_product("cat-ear-1", "Gold Hoop Earrings", Category::Earrings, 6_200, Some(7_000)),
            demo_product("cat-watch-1", "Rose Gold Watch", Category::Watches, 14_999, None),
            demo_product("cat-gift-1", "Anniversary Gift Hamper", Category::GiftSets, 3_499, None),
            demo_product("cat-flower-1", "Red Rose Bouquet", Category::Flowers, 899, None),
            demo_product("cat-cake-1", "Chocolate Truffle Cake", Category::Cakes, 749, None),
        ];
        let assets = vec![AssetEntry {
            key: "hero_jewellery_1".to_string(),
            value: "https://cdn.lustre.example/hero/bridal.jpg".to_string(),
        }];
        Self::new().with_products(products).with_assets(assets)
    }

    /// Replace the stored products.
    #[must_use]
    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.lock().products = products;
        self
    }

    /// Replace the stored assets.
    #[must_use]
    pub fn with_assets(self, assets: Vec<AssetEntry>) -> Self {
        self.lock().assets = assets;
        self
    }

    /// Store a profile.
    #[must_use]
    pub fn with_user(self, profile: UserProfile) -> Self {
        self.lock().users.insert(profile.id.clone(), profile);
        self
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total number of calls received, including failed ones.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current stored products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Current stored profile for a user.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<UserProfile> {
        self.lock().users.get(id).cloned()
    }

    /// Number of images uploaded so far.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.lock().uploads.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<MutexGuard<'_, MemoryState>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable(
                "in-memory backend set to fail".to_string(),
            ));
        }
        Ok(self.lock())
    }
}

fn demo_product(
    id: &str,
    name: &str,
    category: Category,
    price: u32,
    original: Option<u32>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category,
        price: Price::from_rupees(price),
        original_price: original.map(Price::from_rupees),
        image: format!("https://cdn.lustre.example/products/{id}.jpg"),
        description: None,
        specs: Vec::new(),
        in_stock: true,
        on_discount: original.is_some(),
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get_all_products(&self) -> Result<Vec<Product>, BackendError> {
        Ok(self.begin()?.products.clone())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, BackendError> {
        let mut state = self.begin()?;
        let created = product.clone().into_product(ProductId::generate());
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, BackendError> {
        let mut state = self.begin()?;
        let slot = state
            .products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))?;
        let merged = patch.apply_to(slot).map_err(|e| BackendError::Rejected {
            status: 422,
            message: e.to_string(),
        })?;
        *slot = merged.clone();
        Ok(merged)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        let mut state = self.begin()?;
        let before = state.products.len();
        state.products.retain(|p| p.id != *id);
        if state.products.len() == before {
            return Err(BackendError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    async fn get_all_assets(&self) -> Result<Vec<AssetEntry>, BackendError> {
        Ok(self.begin()?.assets.clone())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, BackendError> {
        Ok(self.begin()?.users.get(id).cloned())
    }

    async fn update_user(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<UserProfile, BackendError> {
        let mut state = self.begin()?;
        let current = state
            .users
            .get(id)
            .cloned()
            .unwrap_or_else(|| UserProfile::empty(id.clone()));
        let next = current.patched(patch);
        state.users.insert(id.clone(), next.clone());
        Ok(next)
    }

    async fn upload_product_image(&self, upload: ImageUpload) -> Result<String, BackendError> {
        let mut state = self.begin()?;
        let url = format!(
            "memory://uploads/{}/{}",
            state.uploads.len() + 1,
            upload.file_name
        );
        state.uploads.push(upload);
        Ok(url)
    }
}
