//! Core types for Lustre.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod address;
pub mod address_book;
pub mod category;
pub mod id;
pub mod price;
pub mod product;
pub mod profile;

pub use address::{Address, AddressError, AddressInput, AddressKind, ValidAddress};
pub use address_book::{AddressBook, AddressBookError};
pub use category::{Category, CategoryError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, ProductError, ProductPatch};
pub use profile::{UserPatch, UserProfile};
