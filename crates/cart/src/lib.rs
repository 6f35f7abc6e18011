//! Pixelshelf Cart - the storefront's client-side state core.
//!
//! # Architecture
//!
//! ```text
//! caller ── dispatch(CartAction) ──> Store ── reduce() ──> StoreState
//!                                      │                      │
//!                                      │  cart changed?       └─> subscribers
//!                                      └─> PersistenceBridge ──> CartStorage["cart"]
//! ```
//!
//! - [`reducer::reduce`] is the only mutation path for cart state. It is
//!   pure and total: unknown variants and missing lines are silent no-ops.
//! - [`store::Store`] is constructed explicitly and owns the state, the
//!   persistence bridge and the subscriber list.
//! - [`persistence`] mirrors the cart to a key-value slot and rehydrates it
//!   against the current catalog at startup.
//! - [`totals`] derives subtotals and formatted prices.
//! - [`catalog`] loads products through a cached, retrying fetch layer.
//! - [`checkout`] validates the mocked payment form and hands a cart
//!   snapshot to the order-creation backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod action;
pub mod catalog;
pub mod checkout;
pub mod persistence;
pub mod reducer;
pub mod state;
pub mod store;
pub mod totals;

pub use action::CartAction;
pub use catalog::{
    CatalogError, CatalogLoader, CatalogSource, JsonFileCatalog, LoaderOptions, StaticCatalog,
    refresh_catalog,
};
pub use checkout::{
    CheckoutError, CheckoutForm, InMemoryOrderService, OrderConfirmation, OrderService,
    PaymentDetails, checkout,
};
pub use persistence::{
    CART_KEY, CartStorage, FileStorage, Hydrated, MemoryStorage, PersistenceBridge,
    StorageError,
};
pub use reducer::reduce;
pub use state::{CartLineItem, CartState, StoreState};
pub use store::{Store, SubscriptionId};
pub use totals::CartSummary;

#[cfg(test)]
mod test_utils;
