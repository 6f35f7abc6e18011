//! Derived cart values: line totals, subtotal and display strings.
//!
//! Sums are exact decimal arithmetic; rounding to cents happens only when a
//! [`Price`] is formatted.

use pixelshelf_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::state::{CartLineItem, CartState};

/// Unit price times quantity for one line.
#[must_use]
pub fn line_total(item: &CartLineItem) -> Decimal {
    item.unit_price()
        .saturating_mul(Decimal::from(item.quantity.get()))
}

/// Sum of all line totals.
#[must_use]
pub fn subtotal(cart: &CartState) -> Decimal {
    cart.iter()
        .map(line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Total number of units across all lines.
#[must_use]
pub fn item_count(cart: &CartState) -> u64 {
    cart.iter().map(|item| u64::from(item.quantity.get())).sum()
}

/// Format an amount in the given currency (e.g. `"$109.96"`).
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

/// Snapshot of the figures a cart view displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub lines: usize,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub formatted_subtotal: String,
}

impl CartSummary {
    #[must_use]
    pub fn new(cart: &CartState, currency: CurrencyCode) -> Self {
        let subtotal = subtotal(cart);
        Self {
            lines: cart.len(),
            item_count: item_count(cart),
            subtotal,
            formatted_subtotal: format_price(subtotal, currency),
        }
    }
}
