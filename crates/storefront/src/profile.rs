//! Shopper profile and address book management.
//!
//! Profiles live in the remote user service. Reads go through a `moka`
//! cache (5-minute TTL); every write is sent to the service first and the
//! cache is refreshed with the service's answer only after it succeeds.
//! A failed write therefore leaves both the service and the cached profile
//! as they were.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use lustre_core::{
    Address, AddressBook, AddressBookError, AddressId, AddressInput, UserId, UserPatch, UserProfile,
};

use crate::backend::{Backend, BackendError, ImageUpload};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 10_000;

/// Image types accepted for avatars.
const AVATAR_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 13;

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Address book rule or form validation failed.
    #[error(transparent)]
    Addresses(#[from] AddressBookError),

    /// Avatar file exceeds the upload limit.
    #[error("Image must be smaller than {} MB", .max / (1024 * 1024))]
    AvatarTooLarge {
        /// Size of the submitted file.
        size: usize,
        /// Upload limit.
        max: usize,
    },

    /// Avatar file is not an accepted image type.
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    /// Name or phone failed validation.
    #[error("{0}")]
    InvalidDetails(String),

    /// The remote service call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Editable profile header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Cloneable handle to profile operations.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<ProfileServiceInner>,
}

struct ProfileServiceInner {
    backend: Arc<dyn Backend>,
    cache: Cache<UserId, UserProfile>,
    max_avatar_bytes: usize,
}

impl ProfileService {
    /// Create a service that accepts avatars up to `max_avatar_bytes`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, max_avatar_bytes: usize) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ProfileServiceInner {
                backend,
                cache,
                max_avatar_bytes,
            }),
        }
    }

    /// Load a profile, from cache when possible.
    ///
    /// A shopper the service does not know yet gets an empty profile.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the service cannot be reached.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn profile(&self, user: &UserId) -> Result<UserProfile, ProfileError> {
        if let Some(profile) = self.inner.cache.get(user).await {
            tracing::debug!("Cache hit for profile");
            return Ok(profile);
        }

        let profile = self
            .inner
            .backend
            .get_user(user)
            .await?
            .unwrap_or_else(|| UserProfile::empty(user.clone()));
        self.inner.cache.insert(user.clone(), profile.clone()).await;
        Ok(profile)
    }

    /// The shopper's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the profile cannot be loaded.
    pub async fn addresses(&self, user: &UserId) -> Result<Vec<Address>, ProfileError> {
        Ok(self.profile(user).await?.addresses)
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns `Addresses(Full)` when three are already saved (before the
    /// form is looked at), `Addresses(Invalid)` for a bad form, or `Backend`
    /// if the service write fails.
    #[instrument(skip(self, input), fields(user = %user))]
    pub async fn add_address(
        &self,
        user: &UserId,
        input: &AddressInput,
    ) -> Result<Address, ProfileError> {
        let mut book = self.book(user).await?;
        let address = book.add(AddressId::generate(), input)?;
        self.commit_addresses(user, book).await?;
        tracing::info!(address = %address.id, "Address added");
        Ok(address)
    }

    /// Replace the fields of a saved address, keeping its default flag.
    ///
    /// # Errors
    ///
    /// Returns `Addresses(NotFound)`, `Addresses(Invalid)`, or `Backend`.
    #[instrument(skip(self, input), fields(user = %user, address = %id))]
    pub async fn update_address(
        &self,
        user: &UserId,
        id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ProfileError> {
        let mut book = self.book(user).await?;
        let address = book.update(id, input)?;
        self.commit_addresses(user, book).await?;
        tracing::info!("Address updated");
        Ok(address)
    }

    /// Make one address the default and clear the flag on the rest.
    ///
    /// # Errors
    ///
    /// Returns `Addresses(NotFound)` or `Backend`.
    #[instrument(skip(self), fields(user = %user, address = %id))]
    pub async fn set_default_address(
        &self,
        user: &UserId,
        id: &AddressId,
    ) -> Result<Vec<Address>, ProfileError> {
        let mut book = self.book(user).await?;
        book.set_default(id)?;
        let profile = self.commit_addresses(user, book).await?;
        tracing::info!("Default address changed");
        Ok(profile.addresses)
    }

    /// Delete a saved address. No other address is promoted to default.
    ///
    /// # Errors
    ///
    /// Returns `Addresses(NotFound)` or `Backend`.
    #[instrument(skip(self), fields(user = %user, address = %id))]
    pub async fn delete_address(
        &self,
        user: &UserId,
        id: &AddressId,
    ) -> Result<Address, ProfileError> {
        let mut book = self.book(user).await?;
        let removed = book.remove(id)?;
        self.commit_addresses(user, book).await?;
        tracing::info!("Address deleted");
        Ok(removed)
    }

    /// Update the name and/or phone number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDetails` for an empty name or malformed phone, or
    /// `Backend` if the service write fails.
    #[instrument(skip(self, details), fields(user = %user))]
    pub async fn update_details(
        &self,
        user: &UserId,
        details: &ProfileDetails,
    ) -> Result<UserProfile, ProfileError> {
        let name = details
            .name
            .as_deref()
            .map(|n| validate_name(n).map(str::to_string))
            .transpose()?;
        let phone = details
            .phone
            .as_deref()
            .map(|p| validate_phone(p).map(str::to_string))
            .transpose()?;

        self.commit(
            user,
            &UserPatch {
                name,
                phone,
                ..UserPatch::default()
            },
        )
        .await
    }

    /// Upload a new avatar image and store its URL on the profile.
    ///
    /// The size limit is checked before anything is uploaded.
    ///
    /// # Errors
    ///
    /// Returns `AvatarTooLarge`, `UnsupportedImage`, or `Backend` if either
    /// the upload or the profile write fails.
    #[instrument(skip(self, bytes), fields(user = %user, size = bytes.len()))]
    pub async fn update_avatar(
        &self,
        user: &UserId,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UserProfile, ProfileError> {
        if bytes.len() > self.inner.max_avatar_bytes {
            return Err(ProfileError::AvatarTooLarge {
                size: bytes.len(),
                max: self.inner.max_avatar_bytes,
            });
        }
        if !AVATAR_CONTENT_TYPES.contains(&content_type) {
            return Err(ProfileError::UnsupportedImage(content_type.to_string()));
        }

        let url = self
            .inner
            .backend
            .upload_product_image(ImageUpload {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            })
            .await?;

        self.commit(
            user,
            &UserPatch {
                avatar_url: Some(url),
                ..UserPatch::default()
            },
        )
        .await
    }

    /// Store the shopper's language on their profile.
    ///
    /// # Errors
    ///
    /// Returns `Backend` if the service write fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn set_language(
        &self,
        user: &UserId,
        language: &str,
    ) -> Result<UserProfile, ProfileError> {
        self.commit(
            user,
            &UserPatch {
                language: Some(language.to_string()),
                ..UserPatch::default()
            },
        )
        .await
    }

    async fn book(&self, user: &UserId) -> Result<AddressBook, ProfileError> {
        Ok(AddressBook::from(self.profile(user).await?.addresses))
    }

    async fn commit_addresses(
        &self,
        user: &UserId,
        book: AddressBook,
    ) -> Result<UserProfile, ProfileError> {
        self.commit(
            user,
            &UserPatch {
                addresses: Some(book.into_vec()),
                ..UserPatch::default()
            },
        )
        .await
    }

    /// Write to the service, then cache what it returns.
    async fn commit(&self, user: &UserId, patch: &UserPatch) -> Result<UserProfile, ProfileError> {
        let updated = self.inner.backend.update_user(user, patch).await?;
        self.inner.cache.insert(user.clone(), updated.clone()).await;
        Ok(updated)
    }
}

fn validate_name(name: &str) -> Result<&str, ProfileError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProfileError::InvalidDetails(
            "Name cannot be empty".to_string(),
        ));
    }
    Ok(name)
}

/// Digits with optional `+`, spaces and dashes; 10 to 13 digits in total.
fn validate_phone(phone: &str) -> Result<&str, ProfileError> {
    let phone = phone.trim();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !allowed || !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(ProfileError::InvalidDetails(
            "Please enter a valid phone number".to_string(),
        ));
    }
    Ok(phone)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lustre_core::AddressKind;

    use super::*;
    use crate::backend::InMemoryBackend;

    const MAX_AVATAR: usize = 5 * 1024 * 1024;

    fn form(street: &str) -> AddressInput {
        AddressInput {
            street: street.to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            zip: "600001".to_string(),
            kind: AddressKind::Work,
        }
    }

    fn service() -> (Arc<InMemoryBackend>, ProfileService, UserId) {
        let user = UserId::new("u1");
        let mut profile = UserProfile::empty(user.clone());
        profile.name = "Kavya".to_string();
        let backend = Arc::new(InMemoryBackend::new().with_user(profile));
        let service = ProfileService::new(backend.clone(), MAX_AVATAR);
        (backend, service, user)
    }

    fn defaults(addresses: &[Address]) -> Vec<&str> {
        addresses
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_user_gets_empty_profile() {
        let (_, service, _) = service();
        let profile = service.profile(&UserId::new("new-shopper")).await.unwrap();
        assert!(profile.name.is_empty());
        assert!(profile.addresses.is_empty());
    }

    #[tokio::test]
    async fn test_first_address_is_default_and_persisted() {
        let (backend, service, user) = service();
        let first = service.add_address(&user, &form("12 Anna Salai")).await.unwrap();
        let second = service.add_address(&user, &form("7 Mount Road")).await.unwrap();

        assert!(first.is_default);
        assert!(!second.is_default);
        assert_eq!(backend.user(&user).unwrap().addresses.len(), 2);
        assert_eq!(service.addresses(&user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fourth_address_rejected_before_validation() {
        let (backend, service, user) = service();
        for street in ["1 First Street", "2 Second Street", "3 Third Street"] {
            service.add_address(&user, &form(street)).await.unwrap();
        }
        let calls = backend.call_count();

        let err = service
            .add_address(&user, &AddressInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Addresses(AddressBookError::Full { max: 3 })
        ));
        assert_eq!(backend.call_count(), calls);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cached_profile() {
        let (backend, service, user) = service();
        service.add_address(&user, &form("12 Anna Salai")).await.unwrap();

        backend.set_failing(true);
        let err = service
            .add_address(&user, &form("7 Mount Road"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Backend(_)));

        // Served from cache, still the pre-failure state.
        let addresses = service.addresses(&user).await.unwrap();
        assert_eq!(addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_set_default_leaves_exactly_one() {
        let (_, service, user) = service();
        service.add_address(&user, &form("12 Anna Salai")).await.unwrap();
        let second = service.add_address(&user, &form("7 Mount Road")).await.unwrap();

        let addresses = service
            .set_default_address(&user, &second.id)
            .await
            .unwrap();
        assert_eq!(defaults(&addresses), vec![second.id.as_str()]);
    }

    #[tokio::test]
    async fn test_deleting_default_leaves_no_default() {
        let (_, service, user) = service();
        let first = service.add_address(&user, &form("12 Anna Salai")).await.unwrap();
        service.add_address(&user, &form("7 Mount Road")).await.unwrap();

        service.delete_address(&user, &first.id).await.unwrap();
        let addresses = service.addresses(&user).await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert!(defaults(&addresses).is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_default_flag() {
        let (_, service, user) = service();
        let first = service.add_address(&user, &form("12 Anna Salai")).await.unwrap();
        let edited = service
            .update_address(&user, &first.id, &form("99 Cathedral Road"))
            .await
            .unwrap();
        assert!(edited.is_default);
        assert_eq!(edited.street, "99 Cathedral Road");
    }

    #[tokio::test]
    async fn test_oversized_avatar_rejected_without_upload() {
        let (backend, service, user) = service();
        let err = service
            .update_avatar(&user, "me.png", "image/png", vec![0; MAX_AVATAR + 1])
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::AvatarTooLarge { .. }));
        assert_eq!(err.to_string(), "Image must be smaller than 5 MB");
        assert_eq!(backend.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_avatar_upload_sets_url() {
        let (backend, service, user) = service();
        let profile = service
            .update_avatar(&user, "me.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(profile.avatar_url.as_deref(), Some("memory://uploads/1/me.png"));
        assert_eq!(backend.upload_count(), 1);

        let err = service
            .update_avatar(&user, "me.svg", "image/svg+xml", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedImage(_)));
    }

    #[tokio::test]
    async fn test_update_details() {
        let (_, service, user) = service();
        let profile = service
            .update_details(
                &user,
                &ProfileDetails {
                    name: Some("  Kavya R ".to_string()),
                    phone: Some("+91 98765-43210".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.name, "Kavya R");
        assert_eq!(profile.phone.as_deref(), Some("+91 98765-43210"));

        let err = service
            .update_details(
                &user,
                &ProfileDetails {
                    name: None,
                    phone: Some("12345".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidDetails(_)));
    }
}
