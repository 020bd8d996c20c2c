//! Application state composition root.
//!
//! All stores are constructed here, wired to one persistence backend and
//! one catalog, and injected into whatever layer drives them. There are no
//! module-level singletons: tests build an isolated `AppState` per case.

use std::sync::Arc;

use crate::auth::AuthStore;
use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::checkout::{CheckoutError, CheckoutRequest, CheckoutService};
use crate::orders::{Order, OrdersStore};
use crate::persist::{KeyValueStore, StorageError};
use crate::toast::ToastStore;

/// The full application state: catalog plus the four stores.
pub struct AppState {
    /// Read-only product catalog.
    pub catalog: Catalog,
    /// Shopping cart.
    pub cart: CartStore,
    /// User registry and session.
    pub auth: AuthStore,
    /// Order history.
    pub orders: OrdersStore,
    /// Notification queue.
    pub toasts: ToastStore,
}

impl AppState {
    /// Load all stores from the given backend.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if any store's document cannot be read.
    pub fn load(kv: Arc<dyn KeyValueStore>, catalog: Catalog) -> Result<Self, StorageError> {
        Ok(Self {
            catalog,
            cart: CartStore::load(Arc::clone(&kv))?,
            auth: AuthStore::load(Arc::clone(&kv))?,
            orders: OrdersStore::load(kv)?,
            toasts: ToastStore::new(),
        })
    }

    /// Place an order from the current cart. See
    /// [`CheckoutService::place_order`].
    ///
    /// # Errors
    ///
    /// Propagates [`CheckoutError`] from the checkout service.
    pub async fn checkout(&mut self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        CheckoutService::new(&self.catalog)
            .place_order(request, &mut self.cart, &self.auth, &mut self.orders)
            .await
    }
}
