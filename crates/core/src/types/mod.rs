//! Core types for Pixelshelf.
//!
//! This module provides type-safe wrappers for storefront domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceParseError};
pub use product::{Product, ProductVariant};
pub use status::OrderStatus;
