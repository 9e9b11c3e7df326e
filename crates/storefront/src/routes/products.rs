//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use lustre_core::{Category, NewProduct, Product, ProductId, ProductPatch};

use crate::catalog::CatalogError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product display data for grids and search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: String,
    pub original_price: Option<String>,
    pub discount_percent: Option<u32>,
    pub image: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price.display(),
            original_price: product.original_price.map(|p| p.display()),
            discount_percent: product.discount_percent(),
            image: product.image.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// Display product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ProductCard>> {
    let cards = state
        .catalog()
        .list()
        .iter()
        .map(ProductCard::from)
        .collect();
    Json(cards)
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    state
        .catalog()
        .get(&id)
        .map(Json)
        .ok_or(AppError::Catalog(CatalogError::NotFound(id)))
}

/// Create a product. Admin only.
#[instrument(skip(state, _admin, new), fields(name = %new.name))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create(&new).await?;
    add_breadcrumb("catalog", "Product created", Some(&[("id", product.id.as_str())]));
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product. Admin only.
#[instrument(skip(state, _admin, patch))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state.catalog().update(&id, &patch).await?;
    add_breadcrumb("catalog", "Product updated", Some(&[("id", id.as_str())]));
    Ok(Json(product))
}

/// Delete a product. Admin only.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.catalog().delete(&id).await?;
    add_breadcrumb("catalog", "Product deleted", Some(&[("id", id.as_str())]));
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
