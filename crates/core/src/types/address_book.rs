//! A shopper's bounded list of saved addresses.
//!
//! Invariants held by every operation:
//! - at most [`AddressBook::MAX_ADDRESSES`] entries, checked when adding
//! - at most one address has `is_default` set
//!
//! Deleting the default address does not promote another one; the book is
//! simply left without a default until the shopper picks one.

use super::address::{Address, AddressError, AddressInput};
use super::id::AddressId;

/// Errors from address book operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressBookError {
    /// The book already holds the maximum number of addresses.
    #[error("You can save up to {max} addresses")]
    Full {
        /// Maximum number of addresses.
        max: usize,
    },
    /// No address with this id exists.
    #[error("Address not found: {0}")]
    NotFound(AddressId),
    /// The submitted form failed validation.
    #[error(transparent)]
    Invalid(#[from] AddressError),
}

/// The saved addresses of one shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Maximum number of saved addresses.
    pub const MAX_ADDRESSES: usize = 3;

    /// Wrap an existing list, as loaded from the profile.
    #[must_use]
    pub const fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// The addresses in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[Address] {
        &self.addresses
    }

    /// Consume the book and return the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Address> {
        self.addresses
    }

    /// Number of saved addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns `true` if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// The current default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Add a new address.
    ///
    /// The size cap is checked before the form is validated. The first
    /// address saved becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `Full` if the book is at capacity, or `Invalid` if the form
    /// fails validation.
    pub fn add(
        &mut self,
        id: AddressId,
        input: &AddressInput,
    ) -> Result<Address, AddressBookError> {
        if self.addresses.len() >= Self::MAX_ADDRESSES {
            return Err(AddressBookError::Full {
                max: Self::MAX_ADDRESSES,
            });
        }
        let valid = input.validate()?;
        let is_default = self.addresses.is_empty();
        let address = valid.into_address(id, is_default);
        self.addresses.push(address.clone());
        Ok(address)
    }

    /// Replace the fields of an existing address.
    ///
    /// The id and default flag are kept from the stored record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown, or `Invalid` if the form
    /// fails validation.
    pub fn update(
        &mut self,
        id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, AddressBookError> {
        let slot = self
            .addresses
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| AddressBookError::NotFound(id.clone()))?;
        let valid = input.validate()?;
        *slot = valid.into_address(slot.id.clone(), slot.is_default);
        Ok(slot.clone())
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown; the book is unchanged.
    pub fn set_default(&mut self, id: &AddressId) -> Result<(), AddressBookError> {
        self.position(id)?;
        for address in &mut self.addresses {
            address.is_default = address.id == *id;
        }
        Ok(())
    }

    /// Remove an address and return it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn remove(&mut self, id: &AddressId) -> Result<Address, AddressBookError> {
        let index = self.position(id)?;
        Ok(self.addresses.remove(index))
    }

    fn position(&self, id: &AddressId) -> Result<usize, AddressBookError> {
        self.addresses
            .iter()
            .position(|a| a.id == *id)
            .ok_or_else(|| AddressBookError::NotFound(id.clone()))
    }
}

impl From<Vec<Address>> for AddressBook {
    fn from(addresses: Vec<Address>) -> Self {
        Self::new(addresses)
    }
}
