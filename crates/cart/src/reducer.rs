//! The cart state machine.
//!
//! [`reduce`] is pure and total: it never panics, never logs and never
//! performs I/O. Payloads that reference nothing (an unknown variant, a
//! line that is not in the cart) leave the state unchanged.

use std::num::NonZeroU32;

use crate::action::CartAction;
use crate::state::{CartLineItem, StoreState};

/// Compute the next state from the current state and an action.
#[must_use]
pub fn reduce(mut state: StoreState, action: CartAction) -> StoreState {
    match action {
        CartAction::SetProducts(products) => {
            state.products = products;
        }
        CartAction::AddToCart {
            product,
            variant_id,
            quantity,
        } => {
            let Some(variant) = product.variant(&variant_id).cloned() else {
                return state;
            };

            let existing = state
                .cart
                .items
                .iter_mut()
                .find(|item| item.product.id == product.id && item.variant.id == variant.id);

            match existing {
                // Merge in place so the line keeps its first-add position.
                Some(item) => item.quantity = item.quantity.saturating_add(quantity.get()),
                None => state.cart.items.push(CartLineItem {
                    product,
                    variant,
                    quantity,
                }),
            }
        }
        CartAction::UpdateCartItem { key, quantity } => match NonZeroU32::new(quantity) {
            Some(quantity) => {
                if let Some(item) = state.cart.get_mut(&key) {
                    item.quantity = quantity;
                }
            }
            None => state.cart.items.retain(|item| !item.matches(&key)),
        },
        CartAction::RemoveFromCart { key } => {
            state.cart.items.retain(|item| !item.matches(&key));
        }
        CartAction::ClearCart => {
            state.cart.items.clear();
        }
        CartAction::SetLoading(loading) => {
            state.loading = loading;
        }
        CartAction::SetError(error) => {
            state.error = error;
        }
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use pixelshelf_core::LineKey;

    use super::*;
    use crate::test_utils::{add, catalog, product};

    fn with_catalog() -> StoreState {
        reduce(StoreState::default(), CartAction::SetProducts(catalog()))
    }

    #[test]
    fn test_set_products_replaces_catalog() {
        let state = with_catalog();
        assert_eq!(state.products.len(), 2);

        let state = reduce(state, CartAction::SetProducts(Vec::new()));
        assert!(state.products.is_empty());
    }

    #[test]
    fn test_add_appends_new_line() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v2", 1));

        assert_eq!(state.cart.len(), 1);
        let line = &state.cart.items[0];
        assert_eq!(line.key(), LineKey::new("1", "v2"));
        assert_eq!(line.quantity.get(), 1);
        assert_eq!(line.variant.name, "Commercial");
    }

    #[test]
    fn test_repeated_add_merges_quantity() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v1", 2));
        let state = reduce(state, add(&products[0], "v1", 3));

        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart.items[0].quantity.get(), 5);
    }

    #[test]
    fn test_merge_preserves_first_add_position() {
        let products = catalog();
        let mut state = with_catalog();
        state = reduce(state, add(&products[0], "v1", 1));
        state = reduce(state, add(&products[1], "v1", 1));
        state = reduce(state, add(&products[0], "v1", 1));

        let keys: Vec<_> = state.cart.iter().map(CartLineItem::key).collect();
        assert_eq!(keys, vec![LineKey::new("1", "v1"), LineKey::new("2", "v1")]);
        assert_eq!(state.cart.items[0].quantity.get(), 2);
    }

    #[test]
    fn test_same_variant_id_on_different_products_is_two_lines() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v1", 1));
        let state = reduce(state, add(&products[1], "v1", 1));
        assert_eq!(state.cart.len(), 2);
    }

    #[test]
    fn test_unknown_variant_is_noop() {
        let products = catalog();
        let before = reduce(with_catalog(), add(&products[0], "v1", 1));
        let after = reduce(before.clone(), add(&products[0], "missing", 1));
        assert_eq!(before, after);
    }

    #[test]
    fn test_product_without_variants_cannot_be_added() {
        let bare = product("9", 100, Vec::new());
        let state = reduce(StoreState::default(), add(&bare, "v1", 1));
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v1", u32::MAX));
        let state = reduce(state, add(&products[0], "v1", 5));
        assert_eq!(state.cart.items[0].quantity.get(), u32::MAX);
    }

    #[test]
    fn test_update_sets_quantity() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v2", 1));
        let state = reduce(
            state,
            CartAction::UpdateCartItem {
                key: LineKey::new("1", "v2"),
                quantity: 3,
            },
        );
        assert_eq!(state.cart.items[0].quantity.get(), 3);
        assert_eq!(state.cart.items[0].variant.name, "Commercial");
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v2", 4));
        let state = reduce(
            state,
            CartAction::UpdateCartItem {
                key: LineKey::new("1", "v2"),
                quantity: 0,
            },
        );
        assert!(state.cart.get(&LineKey::new("1", "v2")).is_none());
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_update_missing_line_is_noop() {
        let products = catalog();
        let before = reduce(with_catalog(), add(&products[0], "v1", 1));
        let after = reduce(
            before.clone(),
            CartAction::UpdateCartItem {
                key: LineKey::new("2", "v1"),
                quantity: 7,
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_filters_only_matching_line() {
        let products = catalog();
        let mut state = with_catalog();
        state = reduce(state, add(&products[0], "v1", 1));
        state = reduce(state, add(&products[0], "v2", 1));
        state = reduce(
            state,
            CartAction::RemoveFromCart {
                key: LineKey::new("1", "v1"),
            },
        );

        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart.items[0].key(), LineKey::new("1", "v2"));

        let unchanged = reduce(
            state.clone(),
            CartAction::RemoveFromCart {
                key: LineKey::new("1", "v1"),
            },
        );
        assert_eq!(state, unchanged);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v1", 2));
        let once = reduce(state, CartAction::ClearCart);
        assert!(once.cart.is_empty());
        let twice = reduce(once.clone(), CartAction::ClearCart);
        assert_eq!(once, twice);
        assert_eq!(twice.products.len(), 2);
    }

    #[test]
    fn test_status_fields_do_not_touch_cart() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v1", 1));
        let cart = state.cart.clone();

        let state = reduce(state, CartAction::SetLoading(true));
        let state = reduce(state, CartAction::SetError(Some("offline".to_owned())));
        assert!(state.loading);
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert_eq!(state.cart, cart);
    }

    #[test]
    fn test_catalog_reload_keeps_line_snapshots() {
        let products = catalog();
        let state = reduce(with_catalog(), add(&products[0], "v2", 1));

        let mut edited = catalog();
        edited[0].title = "Renamed".to_owned();
        let state = reduce(state, CartAction::SetProducts(edited));

        assert_eq!(state.products[0].title, "Renamed");
        assert_eq!(state.cart.items[0].product.title, "Product 1");
    }
}
