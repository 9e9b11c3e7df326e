//! Lustre Core - Shared domain types.
//!
//! This crate provides the domain types used across all Lustre components:
//! - `storefront` - Public-facing storefront service
//! - `cli` - Operator tools for seeding and managing the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no HTTP
//! clients. Address validation and the bounded address book live here so the
//! storefront and the CLI enforce exactly the same invariants.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, categories, products, addresses, and profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
