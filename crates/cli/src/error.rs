//! Unified error type for CLI commands.

use pixelshelf_cart::{CatalogError, CheckoutError};
use pixelshelf_core::{LineKey, ProductId};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("Product {product} has no variant {variant}")]
    UnknownVariant { product: ProductId, variant: String },

    #[error("Not in cart: {0}")]
    NotInCart(LineKey),
}

/// Result type alias for `CliError`.
pub type Result<T> = std::result::Result<T, CliError>;
