//! Shared helpers for Farine integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use farine_core::PaymentMethod;
use farine_store::{AppState, Catalog, CheckoutRequest, MemoryStore};

/// A fresh, isolated app state over an in-memory backend and the demo
/// catalog.
///
/// # Panics
///
/// Panics if the empty backend cannot be loaded, which cannot happen with
/// [`MemoryStore`].
#[must_use]
pub fn fresh_state() -> AppState {
    AppState::load(Arc::new(MemoryStore::new()), Catalog::demo())
        .expect("memory-backed state always loads")
}

/// A valid checkout request for tests to start from.
#[must_use]
pub fn checkout_request(name: &str, email: &str) -> CheckoutRequest {
    CheckoutRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        phone: "+33 6 00 00 00 00".to_owned(),
        address: "1 Rue du Four".to_owned(),
        city: "Lyon".to_owned(),
        zip: "69001".to_owned(),
        payment_method: PaymentMethod::CardPayment,
    }
}
