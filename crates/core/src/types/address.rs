//! Shipping addresses and their validation rules.

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// Minimum number of characters in a street line.
pub const MIN_STREET_LENGTH: usize = 5;

/// Number of digits in a postal (PIN) code.
pub const ZIP_LENGTH: usize = 6;

/// Validation failures for an address form.
///
/// Messages are written for the shopper; they are shown verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Street, city, or zip is blank.
    #[error("Please fill in street, city and zip code")]
    MissingRequired,
    /// The street line is too short to be deliverable.
    #[error("Street address must be at least {min} characters")]
    StreetTooShort {
        /// Minimum length.
        min: usize,
    },
    /// The city contains something other than letters and spaces.
    #[error("City must contain only letters and spaces")]
    InvalidCity,
    /// The state contains something other than letters and spaces.
    #[error("State must contain only letters and spaces")]
    InvalidState,
    /// The zip is not exactly six digits.
    #[error("Zip code must be exactly {len} digits")]
    InvalidZip {
        /// Required length.
        len: usize,
    },
}

/// Label shown next to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AddressKind {
    #[default]
    Home,
    Work,
    Other,
}

/// A saved address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(rename = "type", default)]
    pub kind: AddressKind,
    #[serde(default)]
    pub is_default: bool,
}

/// Raw address form input, as submitted by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(rename = "type", default)]
    pub kind: AddressKind,
}

/// An address form that passed [`AddressInput::validate`].
///
/// Fields are trimmed. The only way to build one is through validation, so
/// holding a `ValidAddress` proves the rules were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAddress {
    street: String,
    city: String,
    state: String,
    zip: String,
    kind: AddressKind,
}

impl AddressInput {
    /// Validate the form.
    ///
    /// Rules are checked in order and the first failure is returned:
    /// 1. street, city and zip are non-empty
    /// 2. street has at least 5 characters
    /// 3. city is letters and spaces only
    /// 4. state is letters and spaces only
    /// 5. zip is exactly 6 digits
    ///
    /// # Errors
    ///
    /// Returns the `AddressError` for the first rule that fails.
    pub fn validate(&self) -> Result<ValidAddress, AddressError> {
        let street = self.street.trim();
        let city = self.city.trim();
        let state = self.state.trim();
        let zip = self.zip.trim();

        if street.is_empty() || city.is_empty() || zip.is_empty() {
            return Err(AddressError::MissingRequired);
        }
        if street.chars().count() < MIN_STREET_LENGTH {
            return Err(AddressError::StreetTooShort {
                min: MIN_STREET_LENGTH,
            });
        }
        if !is_letters_and_spaces(city) {
            return Err(AddressError::InvalidCity);
        }
        if !is_letters_and_spaces(state) {
            return Err(AddressError::InvalidState);
        }
        if zip.len() != ZIP_LENGTH || !zip.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::InvalidZip { len: ZIP_LENGTH });
        }

        Ok(ValidAddress {
            street: street.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            zip: zip.to_owned(),
            kind: self.kind,
        })
    }
}

fn is_letters_and_spaces(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

impl ValidAddress {
    /// Build a stored address with the given id and default flag.
    #[must_use]
    pub fn into_address(self, id: AddressId, is_default: bool) -> Address {
        Address {
            id,
            street: self.street,
            city: self.city,
            state: self.state,
            zip: self.zip,
            kind: self.kind,
            is_default,
        }
    }
}
