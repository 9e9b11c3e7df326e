//! Seed the catalog from a YAML file.
//!
//! The file is a list of products in the same shape the service accepts:
//!
//! ```yaml
//! - name: Classic Solitaire Ring
//!   category: Rings
//!   price: 18500
//!   originalPrice: 22000
//!   image: https://cdn.example/ring.jpg
//!   specs: ["18k gold", "0.5 ct"]
//! ```
//!
//! Every entry is validated before anything is written.

use std::path::Path;

use tracing::{error, info};

use lustre_core::NewProduct;
use lustre_storefront::backend::Backend;

/// A seed file failed to load.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),
}

/// Parse and validate seed products.
///
/// # Errors
///
/// Returns every failure, tagged with the entry's position and name, rather
/// than stopping at the first. A file that does not parse yields one error.
pub fn parse_products(content: &str) -> Result<Vec<NewProduct>, Vec<String>> {
    let products: Vec<NewProduct> =
        serde_yaml::from_str(content).map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = products
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            p.validate()
                .err()
                .map(|e| format!("#{} ({}): {e}", i + 1, p.name))
        })
        .collect();

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry fails
/// validation, or the service rejects a create.
pub async fn products(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::NotFound(file_path.to_string()).into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await.map_err(SeedError::Io)?;

    let products = match parse_products(&content) {
        Ok(products) => products,
        Err(errors) => {
            error!("Seed file validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(SeedError::Invalid(errors.len()).into());
        }
    };

    info!(count = products.len(), "Seed file validated successfully");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let backend = super::connect()?;
    for new in &products {
        let created = backend.create_product(new).await?;
        info!(id = %created.id, name = %created.name, "Created product");
    }

    info!(count = products.len(), "Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lustre_core::{Category, Price};

    use super::*;

    #[test]
    fn test_parse_valid_file() {
        let yaml = r"
- name: Classic Solitaire Ring
  category: Rings
  price: 18500
  originalPrice: 22000
  image: ring.jpg
- name: Red Rose Bouquet
  category: Flowers
  price: 899
  image: roses.jpg
  inStock: false
";
        let products = parse_products(yaml).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category, Category::Rings);
        assert_eq!(products[0].original_price, Some(Price::from_rupees(22_000)));
        assert!(!products[1].in_stock);
    }

    #[test]
    fn test_parse_reports_every_invalid_entry() {
        let yaml = r#"
- name: ""
  category: Rings
  price: 100
  image: a.jpg
- name: Cheap Original
  category: Cakes
  price: 500
  originalPrice: 400
  image: b.jpg
"#;
        let errors = parse_products(yaml).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("#1"));
        assert!(errors[1].contains("Cheap Original"));
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let yaml = "- name: X\n  category: Shoes\n  price: 1\n  image: x.jpg\n";
        assert!(parse_products(yaml).is_err());
    }
}
