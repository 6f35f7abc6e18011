//! Pixelshelf Core - Shared domain types.
//!
//! This crate provides the types used across all Pixelshelf components:
//! - `cart` - Cart reducer, store, persistence and checkout
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! network clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, emails, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
