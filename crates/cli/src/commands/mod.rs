//! Command implementations.
//!
//! Every command opens the store the same way: load the catalog through the
//! cached loader, then hydrate the persisted cart against it.

pub mod cart;
pub mod catalog;
pub mod checkout;

use pixelshelf_cart::{CatalogLoader, FileStorage, JsonFileCatalog, Store};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::Result;

/// Load the catalog and open the file-backed store.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded after all retries.
pub async fn open_store(config: &CliConfig) -> Result<Store<FileStorage>> {
    let loader = CatalogLoader::new(
        JsonFileCatalog::new(&config.catalog_path),
        config.loader_options(),
    );
    let products = loader.load().await?;

    debug!(
        catalog = %config.catalog_path.display(),
        data_dir = %config.data_dir.display(),
        "Opening store"
    );
    Ok(Store::open(products, FileStorage::new(&config.data_dir)))
}
