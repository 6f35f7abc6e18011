//! Shared fixtures for unit tests.

use std::collections::BTreeSet;
use std::io;
use std::num::NonZeroU32;

use pixelshelf_core::{Product, ProductId, ProductVariant, VariantId};
use rust_decimal::Decimal;

use crate::action::CartAction;
use crate::persistence::{CART_KEY, CartStorage, MemoryStorage, StorageError};

pub fn variant(id: &str, name: &str, cents: Option<i64>) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(id),
        name: name.to_owned(),
        price: cents.map(|c| Decimal::new(c, 2)),
        description: None,
    }
}

pub fn product(id: &str, cents: i64, variants: Vec<ProductVariant>) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: String::new(),
        price: Decimal::new(cents, 2),
        image: None,
        featured: false,
        categories: BTreeSet::new(),
        variants,
    }
}

/// Product "1" (base $49.99) with variants "v1" (inherits) and "v2" ($79.99),
/// and product "2" ($19.99) with a single variant "v1".
pub fn catalog() -> Vec<Product> {
    vec![
        product(
            "1",
            4999,
            vec![
                variant("v1", "Personal", None),
                variant("v2", "Commercial", Some(7999)),
            ],
        ),
        product("2", 1999, vec![variant("v1", "Standard", None)]),
    ]
}

pub fn qty(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

pub fn add(product: &Product, variant_id: &str, n: u32) -> CartAction {
    CartAction::AddToCart {
        product: product.clone(),
        variant_id: VariantId::new(variant_id),
        quantity: qty(n),
    }
}

/// Storage whose reads always fail while writes land in an inner slot.
#[derive(Debug, Default)]
pub struct UnreadableStorage {
    pub inner: MemoryStorage,
}

impl UnreadableStorage {
    pub fn holding(cart: &str) -> Self {
        Self {
            inner: MemoryStorage::new().with(CART_KEY, cart),
        }
    }
}

impl CartStorage for UnreadableStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Read {
            key: key.to_owned(),
            source: io::Error::other("device busy"),
        })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.write(key, value)
    }
}
