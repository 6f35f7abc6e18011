//! Cart commands: show, add, update, remove, clear.

use std::num::NonZeroU32;

use pixelshelf_cart::totals::{self, CartSummary};
use pixelshelf_cart::{CartAction, FileStorage, Store};
use pixelshelf_core::{LineKey, Price, ProductId, VariantId};
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, Result};

/// Print the cart contents and subtotal.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn show(config: &CliConfig) -> Result<()> {
    let store = super::open_store(config).await?;
    print_cart(&store, config);
    Ok(())
}

/// Add a product variant to the cart.
///
/// # Errors
///
/// Returns an error if the product or variant does not exist.
pub async fn add(
    config: &CliConfig,
    product_id: &str,
    variant_id: &str,
    quantity: NonZeroU32,
) -> Result<()> {
    let mut store = super::open_store(config).await?;

    let product = store
        .state()
        .product(product_id)
        .cloned()
        .ok_or_else(|| CliError::UnknownProduct(ProductId::new(product_id)))?;
    if product.variant(&VariantId::new(variant_id)).is_none() {
        return Err(CliError::UnknownVariant {
            product: product.id,
            variant: variant_id.to_owned(),
        });
    }

    info!("Added {quantity} x {} ({variant_id})", product.title);
    store.dispatch(CartAction::AddToCart {
        product,
        variant_id: VariantId::new(variant_id),
        quantity,
    });
    print_cart(&store, config);
    Ok(())
}

/// Set the quantity of a cart line. Zero removes it.
///
/// # Errors
///
/// Returns an error if the line is not in the cart.
pub async fn update(
    config: &CliConfig,
    product_id: &str,
    variant_id: &str,
    quantity: u32,
) -> Result<()> {
    let mut store = super::open_store(config).await?;
    let key = existing_line(&store, product_id, variant_id)?;

    store.dispatch(CartAction::UpdateCartItem { key, quantity });
    print_cart(&store, config);
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the line is not in the cart.
pub async fn remove(config: &CliConfig, product_id: &str, variant_id: &str) -> Result<()> {
    let mut store = super::open_store(config).await?;
    let key = existing_line(&store, product_id, variant_id)?;

    store.dispatch(CartAction::RemoveFromCart { key });
    print_cart(&store, config);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn clear(config: &CliConfig) -> Result<()> {
    let mut store = super::open_store(config).await?;
    store.dispatch(CartAction::ClearCart);
    info!("Cart cleared");
    Ok(())
}

fn existing_line(
    store: &Store<FileStorage>,
    product_id: &str,
    variant_id: &str,
) -> Result<LineKey> {
    let key = LineKey::new(product_id, variant_id);
    if store.state().cart.get(&key).is_none() {
        return Err(CliError::NotInCart(key));
    }
    Ok(key)
}

fn print_cart(store: &Store<FileStorage>, config: &CliConfig) {
    let cart = &store.state().cart;
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in cart {
        info!(
            "{} {} - {} x {} = {}",
            item.key(),
            item.product.title,
            item.quantity,
            Price::new(item.unit_price(), config.currency),
            Price::new(totals::line_total(item), config.currency)
        );
    }

    let summary = CartSummary::new(cart, config.currency);
    info!(
        "{} items, subtotal {}",
        summary.item_count, summary.formatted_subtotal
    );
}
