//! Farine Store - Client-side state stores.
//!
//! The storefront's application state lives in four isolated stores, each
//! owning one slice of state plus the operations that mutate it:
//!
//! - [`cart::CartStore`] - shopping cart line items
//! - [`auth::AuthStore`] - local user registry and the current session
//! - [`orders::OrdersStore`] - append-only record of completed purchases
//! - [`toast::ToastStore`] - ephemeral notification queue with auto-expiry
//!
//! Cart, auth, and orders persist their full state through a
//! [`persist::KeyValueStore`] backend on every mutation and reload it on
//! construction; the toast queue is in-memory only. Stores never call each
//! other - cross-store flows (checkout) live in [`checkout`], and
//! [`state::AppState`] is the composition root that wires everything to one
//! backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod persist;
pub mod state;
pub mod toast;

pub use auth::{AuthError, AuthStore, Session, UserRecord};
pub use cart::{CartLine, CartStore};
pub use catalog::{Catalog, Category, Product};
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutService};
pub use orders::{DeliveryAddress, Order, OrderDraft, OrderLine, OrdersStore};
pub use persist::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use state::AppState;
pub use toast::{ToastKind, ToastMessage, ToastStore};
