//! Catalog product and variant records.
//!
//! Products are loaded wholesale from the catalog source and never mutated
//! in place. Field names serialize in camelCase to match the backend's
//! product table.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, immutable catalog identifier.
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Base unit price, used when a variant does not set its own.
    pub price: Decimal,
    /// Image URL or storage path.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Variants in display order.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Look up a variant by its identifier within this product.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// A product without variants cannot be added to a cart.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Whether the product carries the given category label (case-insensitive).
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    /// Lowest unit price across variants, or the base price if none.
    #[must_use]
    pub fn starting_price(&self) -> Decimal {
        self.variants
            .iter()
            .map(|v| v.unit_price(self))
            .min()
            .unwrap_or(self.price)
    }
}

/// A purchasable option of a product (e.g. "Standard License").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique within the parent product only.
    pub id: VariantId,
    pub name: String,
    /// Overrides the parent product's price when present.
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductVariant {
    /// Effective unit price: the variant price if set, else the product price.
    #[must_use]
    pub fn unit_price(&self, product: &Product) -> Decimal {
        self.price.unwrap_or(product.price)
    }
}
