//! Catalog browsing commands.

use pixelshelf_cart::catalog;
use pixelshelf_core::{Price, Product};
use tracing::info;

use crate::config::CliConfig;
use crate::error::Result;

/// List catalog products, optionally filtered.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(config: &CliConfig, featured_only: bool, category: Option<&str>) -> Result<()> {
    let store = super::open_store(config).await?;
    let products = &store.state().products;

    let mut selected: Vec<&Product> = if featured_only {
        catalog::featured(products)
    } else {
        products.iter().collect()
    };
    if let Some(category) = category {
        selected.retain(|p| p.in_category(category));
    }

    if selected.is_empty() {
        info!("No products match");
        return Ok(());
    }

    for product in selected {
        let marker = if product.featured { " *" } else { "" };
        info!(
            "{} {}{} (from {})",
            product.id,
            product.title,
            marker,
            Price::new(product.starting_price(), config.currency)
        );
        if !product.is_purchasable() {
            info!("    (not available for purchase)");
        }
        for variant in &product.variants {
            info!(
                "    {} {} {}",
                variant.id,
                variant.name,
                Price::new(variant.unit_price(product), config.currency)
            );
        }
    }

    Ok(())
}
