//! Store and cart state types.

use std::num::NonZeroU32;

use pixelshelf_core::{LineKey, Product, ProductVariant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the store holds: the catalog cache, the cart and status flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    /// Catalog cache, replaced wholesale by `SetProducts`.
    pub products: Vec<Product>,
    pub cart: CartState,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState {
    /// Find a catalog product by ID.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }
}

/// Ordered cart contents. Order reflects when each line was first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
}

impl CartState {
    /// Look up a line item by its composite key.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(key))
    }

    pub(crate) fn get_mut(&mut self, key: &LineKey) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.matches(key))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One line of the cart.
///
/// `product` and `variant` are snapshots taken when the line was first
/// added; later catalog reloads do not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    pub variant: ProductVariant,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// Composite identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            variant_id: self.variant.id.clone(),
        }
    }

    /// Compare identity without allocating a key.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id && self.variant.id == key.variant_id
    }

    /// Effective unit price of the snapshotted variant.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.variant.unit_price(&self.product)
    }
}
