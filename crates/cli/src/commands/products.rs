//! Catalog product management.

use tracing::info;

use lustre_core::ProductId;
use lustre_storefront::backend::Backend;

/// Print every product in the remote catalog.
///
/// # Errors
///
/// Returns an error if the service cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let backend = super::connect()?;
    let products = backend.get_all_products().await?;

    for product in &products {
        println!(
            "{:<24} {:<14} {:>12}  {}",
            product.id,
            product.category,
            product.price.display(),
            product.name
        );
    }

    info!(count = products.len(), "Listed products");
    Ok(())
}

/// Delete a product by id.
///
/// # Errors
///
/// Returns an error if the id is blank or the service rejects the delete.
pub async fn delete(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::parse(id)?;
    let backend = super::connect()?;
    backend.delete_product(&id).await?;
    info!(id = %id, "Deleted product");
    Ok(())
}
