//! Checkout: mocked payment form validation and order creation.
//!
//! There is no payment gateway. The form is validated locally (Luhn check,
//! expiry, CVC), a snapshot of the cart is handed to an [`OrderService`],
//! and the cart is cleared only once the order exists.

use std::future::Future;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use pixelshelf_core::{
    CurrencyCode, Email, EmailError, OrderId, OrderStatus, Price, ProductId, VariantId,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::action::CartAction;
use crate::persistence::CartStorage;
use crate::state::CartState;
use crate::store::Store;
use crate::totals;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer name is required")]
    MissingName,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("card number is invalid")]
    InvalidCardNumber,

    #[error("expiry must be MM/YY: {0}")]
    InvalidExpiry(String),

    #[error("card has expired")]
    CardExpired,

    #[error("CVC must be 3 or 4 digits")]
    InvalidCvc,

    #[error("order creation failed: {0}")]
    Order(#[from] OrderError),
}

/// Errors reported by an [`OrderService`].
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("order backend unavailable: {0}")]
    Unavailable(String),
}

/// Card fields from the payment form.
///
/// Implements `Debug` manually to redact secret fields.
pub struct PaymentDetails {
    pub card_number: SecretString,
    /// `MM/YY`.
    pub expiry: String,
    pub cvc: SecretString,
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

/// Raw checkout form input.
#[derive(Debug)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub email: String,
    pub payment: PaymentDetails,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    pub email: Email,
    pub card_last4: String,
}

impl CheckoutForm {
    /// Validate the form as of `today`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field as a `CheckoutError`.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedCheckout, CheckoutError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(CheckoutError::MissingName);
        }

        let email = Email::parse(&self.email)?;

        let digits = card_digits(self.payment.card_number.expose_secret())
            .ok_or(CheckoutError::InvalidCardNumber)?;
        if !(13..=19).contains(&digits.len()) || !luhn_valid(&digits) {
            return Err(CheckoutError::InvalidCardNumber);
        }

        let (month, year) = parse_expiry(&self.payment.expiry)?;
        if (year, month) < (today.year(), today.month()) {
            return Err(CheckoutError::CardExpired);
        }

        let cvc = self.payment.cvc.expose_secret();
        if !(3..=4).contains(&cvc.len()) || !cvc.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CheckoutError::InvalidCvc);
        }

        let card_last4: String = digits
            .get(digits.len().saturating_sub(4)..)
            .map(|tail| tail.iter().map(|d| char::from(b'0' + d)).collect())
            .unwrap_or_default();

        Ok(ValidatedCheckout {
            customer_name: customer_name.to_owned(),
            email,
            card_last4,
        })
    }
}

/// Card number as digits, allowing space and dash separators.
fn card_digits(input: &str) -> Option<Vec<u8>> {
    input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .map(|c| c.to_digit(10).and_then(|d| u8::try_from(d).ok()))
        .collect()
}

fn luhn_valid(digits: &[u8]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn parse_expiry(expiry: &str) -> Result<(u32, i32), CheckoutError> {
    let invalid = || CheckoutError::InvalidExpiry(expiry.to_owned());

    let (mm, yy) = expiry.trim().split_once('/').ok_or_else(invalid)?;
    if mm.len() != 2 || yy.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = mm.parse().map_err(|_| invalid())?;
    let year: i32 = yy.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((month, 2000 + year))
}

/// One line of an order, copied from the cart at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub title: String,
    pub variant_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// Order payload sent to the order-creation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub email: Email,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub currency: CurrencyCode,
    pub card_last4: String,
}

impl NewOrder {
    fn from_cart(cart: &CartState, checkout: ValidatedCheckout, currency: CurrencyCode) -> Self {
        let lines = cart
            .iter()
            .map(|item| OrderLine {
                product_id: item.product.id.clone(),
                variant_id: item.variant.id.clone(),
                title: item.product.title.clone(),
                variant_name: item.variant.name.clone(),
                unit_price: item.unit_price(),
                quantity: item.quantity.get(),
            })
            .collect();

        Self {
            customer_name: checkout.customer_name,
            email: checkout.email,
            lines,
            subtotal: totals::subtotal(cart),
            currency,
            card_last4: checkout.card_last4,
        }
    }
}

/// Remote order-creation call.
pub trait OrderService: Send + Sync {
    /// Create an order and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the backend rejects or cannot record the order.
    fn create_order(
        &self,
        order: NewOrder,
    ) -> impl Future<Output = Result<OrderId, OrderError>> + Send;
}

/// A recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub details: NewOrder,
}

/// Order backend that keeps orders in memory and marks them paid.
#[derive(Debug, Default)]
pub struct InMemoryOrderService {
    orders: RwLock<Vec<Order>>,
    reject_with: Option<String>,
}

impl InMemoryOrderService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that rejects every order with `reason`.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            orders: RwLock::default(),
            reject_with: Some(reason.into()),
        }
    }

    /// All recorded orders, oldest first.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }
}

impl OrderService for InMemoryOrderService {
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, OrderError> {
        if let Some(reason) = &self.reject_with {
            return Err(OrderError::Rejected(reason.clone()));
        }

        let id = OrderId::generate();
        self.orders.write().await.push(Order {
            id,
            status: OrderStatus::Paid,
            created_at: Utc::now(),
            details: order,
        });
        Ok(id)
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub subtotal: Price,
    pub item_count: u64,
}

/// Validate the form, create an order from the cart, then clear the cart.
///
/// # Errors
///
/// Returns `CheckoutError` if the cart is empty, the form is invalid or the
/// order backend fails. The cart is left untouched on any error.
#[instrument(skip_all, fields(lines = store.state().cart.len()))]
pub async fn checkout<S, O>(
    store: &mut Store<S>,
    form: &CheckoutForm,
    orders: &O,
    currency: CurrencyCode,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: CartStorage,
    O: OrderService,
{
    let cart = &store.state().cart;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let validated = form.validate(Utc::now().date_naive())?;
    let order = NewOrder::from_cart(cart, validated, currency);
    let subtotal = Price::new(order.subtotal, currency);
    let item_count = totals::item_count(cart);

    let order_id = match orders.create_order(order).await {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Order creation failed, cart kept");
            return Err(e.into());
        }
    };

    store.dispatch(CartAction::ClearCart);
    info!(order_id = %order_id, subtotal = %subtotal, "Order placed");

    Ok(OrderConfirmation {
        order_id,
        subtotal,
        item_count,
    })
}
