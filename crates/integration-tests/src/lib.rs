//! Integration tests for Pixelshelf.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pixelshelf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Reducer-driven flows through the store
//! - `persistence` - File-backed cart surviving store restarts
//! - `checkout_flow` - Catalog file to placed order
//!
//! This crate only provides shared fixtures; the tests live in `tests/` and
//! use `tempfile` for scratch storage directories.

use std::path::{Path, PathBuf};

use pixelshelf_cart::{CatalogError, CatalogSource, JsonFileCatalog};
use pixelshelf_core::Product;

/// Path of the sample catalog shipped in `data/`.
#[must_use]
pub fn sample_catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/catalog.json")
}

/// Load the sample catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the sample file is missing or malformed.
pub async fn sample_catalog() -> Result<Vec<Product>, CatalogError> {
    JsonFileCatalog::new(sample_catalog_path())
        .fetch_products()
        .await
}
