//! From catalog file to placed order.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use pixelshelf_cart::checkout::OrderError;
use pixelshelf_cart::{
    CART_KEY, CartAction, CartStorage, CatalogLoader, CheckoutError, CheckoutForm, FileStorage,
    InMemoryOrderService, JsonFileCatalog, LoaderOptions, PaymentDetails, Store, checkout,
    refresh_catalog,
};
use pixelshelf_core::{CurrencyCode, OrderStatus};
use pixelshelf_integration_tests::sample_catalog_path;
use secrecy::SecretString;
use tempfile::tempdir;

fn form() -> CheckoutForm {
    CheckoutForm {
        customer_name: "Grace Hopper".to_owned(),
        email: "grace@Example.org".to_owned(),
        payment: PaymentDetails {
            card_number: SecretString::from("4111 1111 1111 1111".to_owned()),
            expiry: "12/99".to_owned(),
            cvc: SecretString::from("737".to_owned()),
        },
    }
}

fn loader() -> CatalogLoader<JsonFileCatalog> {
    CatalogLoader::new(
        JsonFileCatalog::new(sample_catalog_path()),
        LoaderOptions {
            stale_time: Duration::from_secs(60),
            retries: 0,
            retry_delay: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn order_placed_and_persisted_cart_cleared() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(Vec::new(), FileStorage::new(dir.path()));
    assert_eq!(refresh_catalog(&mut store, &loader()).await.unwrap(), 4);

    let products = store.state().products.clone();
    store.dispatch(CartAction::add_one(products[2].clone(), "team"));
    store.dispatch(CartAction::add_one(products[0].clone(), "v2"));

    let orders = InMemoryOrderService::new();
    let confirmation = checkout(&mut store, &form(), &orders, CurrencyCode::USD)
        .await
        .unwrap();

    assert_eq!(confirmation.subtotal.to_string(), "$478.99");
    assert_eq!(confirmation.item_count, 2);

    let placed = orders.orders().await;
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].status, OrderStatus::Paid);
    assert_eq!(placed[0].details.email.as_str(), "grace@example.org");
    assert_eq!(placed[0].details.card_last4, "1111");

    let raw = store.storage().read(CART_KEY).unwrap().unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn rejected_order_keeps_persisted_cart() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(Vec::new(), FileStorage::new(dir.path()));
    refresh_catalog(&mut store, &loader()).await.unwrap();

    let products = store.state().products.clone();
    store.dispatch(CartAction::add_one(products[1].clone(), "v1"));

    let orders = InMemoryOrderService::rejecting("card declined");
    let err = checkout(&mut store, &form(), &orders, CurrencyCode::USD)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Order(OrderError::Rejected(_))));

    let reopened = Store::open(products, FileStorage::new(dir.path()));
    assert_eq!(reopened.state().cart.len(), 1);
}
