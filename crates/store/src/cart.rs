//! Shopping cart store.
//!
//! The cart belongs to the browser/profile, not to a signed-in user: it
//! persists independent of auth state. At most one line exists per product
//! id - adding an already-carted product merges into the existing line.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use farine_core::{CurrencyCode, Price, ProductId};

use crate::catalog::Catalog;
use crate::persist::{self, KeyValueStore, StorageError, keys};

/// A (product reference, quantity) pair inside the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Foreign key into the catalog. Not validated here: resolution against
    /// the catalog is the reader's concern, see [`CartStore::total`].
    pub product_id: ProductId,
    /// Units of the product. Zero is representable but short-lived:
    /// `set_qty(_, 0)` removes the line.
    pub qty: u32,
}

/// Persisted cart document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CartState {
    items: Vec<CartLine>,
}

/// The shopping cart for the current profile.
///
/// Line order is insertion order - stable for display, not semantically
/// meaningful. Every mutation rewrites the full persisted document.
pub struct CartStore {
    state: CartState,
    kv: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Load the cart from the backend, starting empty if no document exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend read fails or the stored
    /// document is corrupt.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let state = persist::load(kv.as_ref(), keys::FARINE_CART)?.unwrap_or_default();
        Ok(Self { state, kv })
    }

    /// Add `qty` units of a product, merging into an existing line if one
    /// exists, appending otherwise.
    ///
    /// The product id is not checked against any catalog; callers own that
    /// validation. Zero is accepted and merged without a floor.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn add(&mut self, product_id: ProductId, qty: u32) -> Result<(), StorageError> {
        if let Some(line) = self
            .state
            .items
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            line.qty += qty;
        } else {
            self.state.items.push(CartLine { product_id, qty });
        }
        self.persist()
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn add_one(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        self.add(product_id, 1)
    }

    /// Remove the line for a product. No-op if no such line exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), StorageError> {
        self.state.items.retain(|l| &l.product_id != product_id);
        self.persist()
    }

    /// Replace the quantity of an existing line. A quantity of zero removes
    /// the line; if no line exists this never creates one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn set_qty(&mut self, product_id: &ProductId, qty: u32) -> Result<(), StorageError> {
        if qty == 0 {
            return self.remove(product_id);
        }
        if let Some(line) = self
            .state
            .items
            .iter_mut()
            .find(|l| &l.product_id == product_id)
        {
            line.qty = qty;
        }
        self.persist()
    }

    /// Empty the cart. Called after a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.state.items.clear();
        self.persist()
    }

    /// Total units across all lines. Always the live sum, never cached.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.state.items.iter().map(|l| u64::from(l.qty)).sum()
    }

    /// Cart total against a catalog snapshot. Lines whose product id does
    /// not resolve contribute zero rather than failing, so a stale cart
    /// survives catalog changes.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.state
            .items
            .iter()
            .filter_map(|l| catalog.get(&l.product_id).map(|p| p.price.times(l.qty)))
            .fold(Price::zero(CurrencyCode::default()), |acc, p| acc + p)
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.state.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        persist::save(self.kv.as_ref(), keys::FARINE_CART, &self.state)
    }
}
