//! The explicitly constructed cart store.
//!
//! A [`Store`] is created once at startup, hydrated from storage against
//! the current catalog, and passed by reference to whatever needs it.
//! `dispatch` is the only way to change its state.

use std::fmt;
use std::mem;

use pixelshelf_core::Product;
use tracing::{debug, instrument};

use crate::action::CartAction;
use crate::persistence::{CartStorage, Hydrated, PersistenceBridge};
use crate::reducer::reduce;
use crate::state::StoreState;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreState) + Send>;

/// Owns store state, its persistence bridge and the subscriber list.
pub struct Store<S> {
    state: StoreState,
    bridge: PersistenceBridge<S>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: CartStorage> Store<S> {
    /// Build a store over `catalog`, hydrating the cart from `storage`.
    ///
    /// Storage is only rewritten when hydration dropped entries from a slot
    /// it could read. An unreadable slot, or any slot opened against an
    /// empty catalog, is left as found.
    #[instrument(skip_all, fields(products = catalog.len()))]
    pub fn open(catalog: Vec<Product>, storage: S) -> Self {
        let mut bridge = PersistenceBridge::new(storage);
        let Hydrated { cart, pruned } = bridge.hydrate(&catalog);
        if pruned > 0 && !catalog.is_empty() {
            bridge.persist(&cart);
        }

        debug!(lines = cart.len(), pruned, "Store opened");

        Self {
            state: StoreState {
                products: catalog,
                cart,
                ..StoreState::default()
            },
            bridge,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state, read-only.
    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// Underlying storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.bridge.storage()
    }

    /// Apply an action.
    ///
    /// Cart changes are written through to storage before subscribers are
    /// notified. Subscribers are only called when the state changed.
    pub fn dispatch(&mut self, action: CartAction) {
        let name = action.name();
        let products_changed = matches!(
            &action,
            CartAction::SetProducts(products) if *products != self.state.products
        );
        let cart_before = self.state.cart.clone();
        let loading_before = self.state.loading;
        let error_before = self.state.error.clone();

        self.state = reduce(mem::take(&mut self.state), action);

        let cart_changed = self.state.cart != cart_before;
        let status_changed =
            self.state.loading != loading_before || self.state.error != error_before;
        if !(products_changed || cart_changed || status_changed) {
            debug!(action = name, "Action left state unchanged");
            return;
        }

        if cart_changed {
            self.bridge.persist(&self.state.cart);
        }

        debug!(action = name, lines = self.state.cart.len(), "State updated");

        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Register a listener called with the new state after every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("bridge", &self.bridge)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
