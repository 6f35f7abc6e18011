//! Checkout command with the mocked payment form.

use pixelshelf_cart::{CheckoutForm, InMemoryOrderService, PaymentDetails};
use secrecy::SecretString;
use tracing::info;

use crate::config::CliConfig;
use crate::error::Result;

/// Payment form fields collected from the command line.
#[derive(Debug)]
pub struct CheckoutArgs {
    pub name: String,
    pub email: String,
    pub card: SecretString,
    pub expiry: String,
    pub cvc: SecretString,
}

/// Place an order for the current cart.
///
/// Orders go to an in-process backend; the confirmation is the only record.
///
/// # Errors
///
/// Returns an error if the cart is empty, the form is invalid, or order
/// creation fails. The cart is kept on failure.
pub async fn run(config: &CliConfig, args: CheckoutArgs) -> Result<()> {
    let mut store = super::open_store(config).await?;

    let form = CheckoutForm {
        customer_name: args.name,
        email: args.email,
        payment: PaymentDetails {
            card_number: args.card,
            expiry: args.expiry,
            cvc: args.cvc,
        },
    };

    let orders = InMemoryOrderService::new();
    let confirmation =
        pixelshelf_cart::checkout(&mut store, &form, &orders, config.currency).await?;

    info!(
        "Order {} placed: {} items, {}",
        confirmation.order_id, confirmation.item_count, confirmation.subtotal
    );
    Ok(())
}
