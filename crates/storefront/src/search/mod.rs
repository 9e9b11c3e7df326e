//! Product search and filtering over the merged catalog.
//!
//! Search is a pure function of the catalog snapshot and the request:
//!
//! 1. Merge the live catalog, [`OCCASION_PRODUCTS`] and [`DEAL_PRODUCTS`]
//!    (in that order) by id. An id keeps the position where it first appears
//!    and the value from the last source that has it.
//! 2. Keep products whose name, category, description or any spec contains
//!    the query (case-insensitive). An empty query keeps everything.
//! 3. Keep products whose category label equals the requested category
//!    exactly (case-sensitive).
//! 4. Keep products priced at or below the ceiling.
//!
//! Results stay in merge order; nothing is sorted.

mod fixtures;

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use lustre_core::{Price, Product, ProductId};

pub use fixtures::{DEAL_PRODUCTS, OCCASION_PRODUCTS};

/// Deserialize empty strings as None for optional query parameters.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Search request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    /// Free-text query.
    #[serde(default)]
    pub q: String,
    /// Category label to restrict to.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
    /// Collection the shopper navigated from; echoed back only.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub collection: Option<String>,
    /// Price ceiling; defaults to [`Price::DEFAULT_CEILING`].
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<Price>,
}

impl SearchQuery {
    /// The effective price ceiling.
    #[must_use]
    pub fn ceiling(&self) -> Price {
        self.max_price.unwrap_or(Price::DEFAULT_CEILING)
    }
}

/// Search results with the request echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub category: Option<String>,
    pub collection: Option<String>,
    pub max_price: Price,
    pub products: Vec<Product>,
    pub total_count: usize,
    /// Cheapest matched price.
    pub lowest_price: Option<Price>,
    /// Most expensive matched price.
    pub highest_price: Option<Price>,
    /// `true` when nothing matched; the page shows its "no results" state.
    pub is_empty: bool,
}

/// Merge product lists by id.
///
/// Each id appears once, at the position of its first occurrence, carrying
/// the value of its last occurrence.
#[must_use]
pub fn merge_sources<'a, I>(sources: I) -> Vec<Product>
where
    I: IntoIterator<Item = &'a [Product]>,
{
    let mut order: Vec<ProductId> = Vec::new();
    let mut latest: HashMap<ProductId, &Product> = HashMap::new();

    for product in sources.into_iter().flatten() {
        if latest.insert(product.id.clone(), product).is_none() {
            order.push(product.id.clone());
        }
    }

    order
        .iter()
        .filter_map(|id| latest.get(id).map(|p| (*p).clone()))
        .collect()
}

/// The live catalog merged with the occasion and deal lists.
#[must_use]
pub fn merged_catalog(catalog: &[Product]) -> Vec<Product> {
    merge_sources([
        catalog,
        OCCASION_PRODUCTS.as_slice(),
        DEAL_PRODUCTS.as_slice(),
    ])
}

/// Returns `true` if the lowercase `needle` occurs in any searchable field.
fn matches_text(product: &Product, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);

    contains(product.name.as_str())
        || contains(product.category.as_str())
        || product.description.as_deref().is_some_and(contains)
        || product.specs.iter().any(|spec| contains(spec.as_str()))
}

/// Filter already-merged products.
#[must_use]
pub fn filter_products(
    products: &[Product],
    query: &str,
    category: Option<&str>,
    max_price: Price,
) -> Vec<Product> {
    let needle = query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| needle.is_empty() || matches_text(p, &needle))
        .filter(|p| category.is_none_or(|c| p.category.as_str() == c))
        .filter(|p| p.price <= max_price)
        .cloned()
        .collect()
}

/// Merge the catalog with the fixed lists and filter the result.
#[must_use]
pub fn filter(
    catalog: &[Product],
    query: &str,
    category: Option<&str>,
    max_price: Price,
) -> Vec<Product> {
    filter_products(&merged_catalog(catalog), query, category, max_price)
}

/// Run a search request against the catalog snapshot.
#[must_use]
#[instrument(skip(catalog), fields(catalog_size = catalog.len()))]
pub fn search(catalog: &[Product], request: &SearchQuery) -> SearchResults {
    let max_price = request.ceiling();
    let products = filter(catalog, &request.q, request.category.as_deref(), max_price);

    let lowest_price = products.iter().map(|p| p.price).min();
    let highest_price = products.iter().map(|p| p.price).max();
    let total_count = products.len();

    tracing::debug!(total_count, "Search complete");

    SearchResults {
        query: request.q.trim().to_string(),
        category: request.category.clone(),
        collection: request.collection.clone(),
        max_price,
        is_empty: products.is_empty(),
        products,
        total_count,
        lowest_price,
        highest_price,
    }
}
