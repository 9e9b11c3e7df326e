//! Catalog products.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ProductId;
use super::price::Price;

/// Errors raised when a product payload breaks a catalog rule.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product name is empty.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The original (pre-discount) price is lower than the selling price.
    #[error("original price {original} must not be below price {price}")]
    OriginalBelowPrice {
        /// Selling price.
        price: Price,
        /// Original price.
        original: Price,
    },
}

/// A catalog product as stored by the remote persistence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub on_discount: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Percentage off the original price, rounded to the nearest whole percent.
    ///
    /// Returns `None` when there is no original price or it is not above the
    /// selling price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount();
        let price = self.price.amount();
        if original <= price {
            return None;
        }
        let percent = (original - price) * Decimal::ONE_HUNDRED / original;
        percent.round().to_u32()
    }
}

/// Payload for creating a product; the service assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub on_discount: bool,
}

impl NewProduct {
    /// Check the catalog rules for this payload.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` if the name is blank or the original price is
    /// below the selling price.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        check_original_price(self.price, self.original_price)
    }

    /// Attach an id to produce the stored product.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            original_price: self.original_price,
            image: self.image,
            description: self.description,
            specs: self.specs,
            in_stock: self.in_stock,
            on_discount: self.on_discount,
        }
    }
}

/// Partial update merged into an existing product.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_discount: Option<bool>,
}

impl ProductPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.original_price.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.specs.is_none()
            && self.in_stock.is_none()
            && self.on_discount.is_none()
    }

    /// Produce the merged product without touching `product`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError` if the merged product breaks a catalog rule.
    pub fn apply_to(&self, product: &Product) -> Result<Product, ProductError> {
        let mut merged = product.clone();
        if let Some(name) = &self.name {
            merged.name.clone_from(name);
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(price) = self.price {
            merged.price = price;
        }
        if let Some(original) = self.original_price {
            merged.original_price = Some(original);
        }
        if let Some(image) = &self.image {
            merged.image.clone_from(image);
        }
        if let Some(description) = &self.description {
            merged.description = Some(description.clone());
        }
        if let Some(specs) = &self.specs {
            merged.specs.clone_from(specs);
        }
        if let Some(in_stock) = self.in_stock {
            merged.in_stock = in_stock;
        }
        if let Some(on_discount) = self.on_discount {
            merged.on_discount = on_discount;
        }

        if merged.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        check_original_price(merged.price, merged.original_price)?;
        Ok(merged)
    }
}

fn check_original_price(price: Price, original: Option<Price>) -> Result<(), ProductError> {
    match original {
        Some(original) if original < price => {
            Err(ProductError::OriginalBelowPrice { price, original })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ring() -> Product {
        NewProduct {
            name: "Solitaire Ring".to_string(),
            category: Category::Rings,
            price: Price::from_rupees(750),
            original_price: Some(Price::from_rupees(1000)),
            image: "https://cdn.example.com/ring.jpg".to_string(),
            description: None,
            specs: vec!["18k gold".to_string()],
            in_stock: true,
            on_discount: true,
        }
        .into_product(ProductId::new("p1"))
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(ring().discount_percent(), Some(25));

        let mut full_price = ring();
        full_price.original_price = None;
        assert_eq!(full_price.discount_percent(), None);
    }

    #[test]
    fn test_new_product_rejects_original_below_price() {
        let mut draft = NewProduct {
            name: "Pendant".to_string(),
            category: Category::Necklaces,
            price: Price::from_rupees(900),
            original_price: Some(Price::from_rupees(800)),
            image: String::new(),
            description: None,
            specs: Vec::new(),
            in_stock: true,
            on_discount: false,
        };
        assert!(matches!(
            draft.validate(),
            Err(ProductError::OriginalBelowPrice { .. })
        ));

        draft.original_price = Some(Price::from_rupees(900));
        assert!(draft.validate().is_ok());

        draft.name = "  ".to_string();
        assert_eq!(draft.validate(), Err(ProductError::EmptyName));
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let patch = ProductPatch {
            price: Some(Price::from_rupees(700)),
            in_stock: Some(false),
            ..ProductPatch::default()
        };
        let merged = patch.apply_to(&ring()).unwrap();
        assert_eq!(merged.price, Price::from_rupees(700));
        assert!(!merged.in_stock);
        assert_eq!(merged.name, "Solitaire Ring");
        assert_eq!(merged.specs, vec!["18k gold".to_string()]);
    }

    #[test]
    fn test_patch_validates_merged_prices() {
        let patch = ProductPatch {
            price: Some(Price::from_rupees(5000)),
            ..ProductPatch::default()
        };
        assert!(patch.apply_to(&ring()).is_err());
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "id": "p9",
            "name": "Lily Bouquet",
            "category": "Flowers",
            "price": 1200,
            "image": "https://cdn.example.com/lily.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.in_stock);
        assert!(!product.on_discount);
        assert!(product.specs.is_empty());
        assert_eq!(product.category, Category::Flowers);
    }
}
