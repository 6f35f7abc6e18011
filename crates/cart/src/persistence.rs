//! Persistence bridge between the cart and a durable key-value slot.
//!
//! The persisted form carries only identity and quantity:
//!
//! ```json
//! [{ "productId": "1", "variantId": "v2", "quantity": 3 }]
//! ```
//!
//! Product and variant details are re-resolved against the live catalog at
//! hydration time by replaying each entry through `AddToCart`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use pixelshelf_core::{Product, ProductId, VariantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::action::CartAction;
use crate::reducer::reduce;
use crate::state::{CartState, StoreState};

/// Storage key of the persisted cart.
pub const CART_KEY: &str = "cart";

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read storage key {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write storage key {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// A durable string slot keyed by name, like browser local storage.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.slots.insert(key.to_owned(), value.into());
        self
    }

    /// Raw contents of a slot.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Directory-backed storage: each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source: io::Error| StorageError::Write {
            key: key.to_owned(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        // Write to a sibling then rename so readers never see a torn file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)
    }
}

/// One persisted cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLineItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

impl PersistedLineItem {
    fn snapshot(cart: &CartState) -> Vec<Self> {
        cart.iter()
            .map(|item| Self {
                product_id: item.product.id.clone(),
                variant_id: item.variant.id.clone(),
                quantity: item.quantity.get(),
            })
            .collect()
    }
}

/// Outcome of [`PersistenceBridge::hydrate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydrated {
    pub cart: CartState,
    /// Entries dropped from a slot that was read and parsed successfully.
    /// Zero when the slot was missing or unreadable.
    pub pruned: usize,
}

/// Mirrors cart state into a [`CartStorage`] slot and restores it at startup.
#[derive(Debug)]
pub struct PersistenceBridge<S> {
    storage: S,
}

impl<S: CartStorage> PersistenceBridge<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Rebuild the cart from storage against the current catalog.
    ///
    /// Never fails: unreadable or malformed data is logged and treated as
    /// an empty cart, and entries whose product or variant is no longer in
    /// the catalog are dropped and counted in [`Hydrated::pruned`].
    #[must_use]
    pub fn hydrate(&self, catalog: &[Product]) -> Hydrated {
        let raw = match self.storage.read(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Hydrated::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                return Hydrated::default();
            }
        };

        let entries: Vec<PersistedLineItem> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to parse persisted cart, starting empty");
                return Hydrated::default();
            }
        };

        let mut state = StoreState::default();
        let mut pruned = 0;
        for entry in entries {
            let Some(product) = catalog.iter().find(|p| p.id == entry.product_id) else {
                debug!(
                    product_id = %entry.product_id,
                    variant_id = %entry.variant_id,
                    "Dropping persisted line for product no longer in catalog"
                );
                pruned += 1;
                continue;
            };
            let Some(quantity) = NonZeroU32::new(entry.quantity) else {
                debug!(
                    product_id = %entry.product_id,
                    "Dropping persisted line with zero quantity"
                );
                pruned += 1;
                continue;
            };
            if product.variant(&entry.variant_id).is_none() {
                debug!(
                    product_id = %entry.product_id,
                    variant_id = %entry.variant_id,
                    "Dropping persisted line for retired variant"
                );
                pruned += 1;
                continue;
            }

            state = reduce(
                state,
                CartAction::AddToCart {
                    product: product.clone(),
                    variant_id: entry.variant_id,
                    quantity,
                },
            );
        }

        debug!(lines = state.cart.len(), pruned, "Hydrated cart from storage");
        Hydrated {
            cart: state.cart,
            pruned,
        }
    }

    /// Overwrite the persisted slot with the full cart. Failures are logged,
    /// not returned.
    pub fn persist(&mut self, cart: &CartState) {
        let entries = PersistedLineItem::snapshot(cart);
        let json = match serde_json::to_string(&entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.write(CART_KEY, &json) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}
