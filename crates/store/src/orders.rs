//! Orders store.
//!
//! An append-only record of completed purchases. Orders snapshot the
//! catalog data they were priced against, so later catalog edits never
//! rewrite purchase history. Within this codebase orders are immutable once
//! created; status transitions belong to an administrative process that
//! does not exist here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farine_core::{Email, OrderId, OrderStatus, PaymentMethod, Price, ProductId, UserId};

use crate::persist::{self, KeyValueStore, StorageError, keys};

/// A frozen copy of one purchased line at purchase time, intentionally
/// decoupled from future catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product purchased.
    pub product_id: ProductId,
    /// Name at purchase time.
    pub product_name: String,
    /// Display token at purchase time.
    pub emoji: String,
    /// Unit price at purchase time.
    pub price: Price,
    /// Units purchased.
    pub qty: u32,
}

/// Delivery address collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Recipient name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Contact phone, free-form.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub zip: String,
}

/// Everything the caller supplies to create an order.
///
/// The total is trusted as computed by the caller and is not re-derived
/// from the lines here.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Purchasing user, or [`UserId::guest`] when no session is active.
    pub user_id: UserId,
    /// Purchaser name as entered at checkout.
    pub user_name: String,
    /// Purchaser email as entered at checkout.
    pub user_email: Email,
    /// Snapshot of cart lines joined with catalog data.
    pub items: Vec<OrderLine>,
    /// Total computed at purchase time.
    pub total: Price,
    /// Delivery address.
    pub delivery: DeliveryAddress,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
}

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique, human-displayable id, sortable by creation.
    pub id: OrderId,
    /// Purchasing user or the guest sentinel.
    pub user_id: UserId,
    /// Purchaser name.
    pub user_name: String,
    /// Purchaser email.
    pub user_email: Email,
    /// Frozen purchase lines.
    pub items: Vec<OrderLine>,
    /// Total as computed at creation; never recomputed later.
    pub total: Price,
    /// Delivery address.
    pub delivery: DeliveryAddress,
    /// Selected payment method.
    pub payment_method: PaymentMethod,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Lifecycle status, `Pending` at creation.
    pub status: OrderStatus,
}

/// Persisted orders document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OrdersState {
    orders: Vec<Order>,
}

/// Append-only order history, most-recent-first.
pub struct OrdersStore {
    state: OrdersState,
    kv: Arc<dyn KeyValueStore>,
}

impl OrdersStore {
    /// Load order history from the backend, starting empty if no document
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend read fails or the stored
    /// document is corrupt.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let state = persist::load(kv.as_ref(), keys::FARINE_ORDERS)?.unwrap_or_default();
        Ok(Self { state, kv })
    }

    /// Create an order from a draft: generate id and timestamp, set status
    /// to `Pending`, and prepend it so the list stays most-recent-first.
    /// Returns the full created order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if persisting the new state fails.
    pub fn create(&mut self, draft: OrderDraft) -> Result<Order, StorageError> {
        let order = Order {
            id: OrderId::generate(),
            user_id: draft.user_id,
            user_name: draft.user_name,
            user_email: draft.user_email,
            items: draft.items,
            total: draft.total,
            delivery: draft.delivery,
            payment_method: draft.payment_method,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        };

        tracing::info!(order_id = %order.id, user_id = %order.user_id, total = %order.total, "created order");

        self.state.orders.insert(0, order.clone());
        self.persist()?;
        Ok(order)
    }

    /// All orders for a user, in the store's existing most-recent-first
    /// order, as an owned snapshot.
    #[must_use]
    pub fn user_orders(&self, user_id: &UserId) -> Vec<Order> {
        self.state
            .orders
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// All orders, most-recent-first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.state.orders
    }

    /// Number of recorded orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.orders.len()
    }

    /// Whether no orders have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.orders.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        persist::save(self.kv.as_ref(), keys::FARINE_ORDERS, &self.state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::persist::MemoryStore;

    fn store() -> OrdersStore {
        OrdersStore::load(Arc::new(MemoryStore::new())).unwrap()
    }

    fn draft(user: &str, cents: i64) -> OrderDraft {
        OrderDraft {
            user_id: UserId::new(user),
            user_name: "Ana".to_owned(),
            user_email: Email::parse("ana@x.com").unwrap(),
            items: vec![OrderLine {
                product_id: ProductId::new("p1"),
                product_name: "Product One".to_owned(),
                emoji: "🥐".to_owned(),
                price: Price::eur_cents(500),
                qty: 2,
            }],
            total: Price::eur_cents(cents),
            delivery: DeliveryAddress {
                name: "Ana".to_owned(),
                email: Email::parse("ana@x.com").unwrap(),
                phone: String::new(),
                address: "1 Rue du Four".to_owned(),
                city: "Lyon".to_owned(),
                zip: "69001".to_owned(),
            },
            payment_method: PaymentMethod::CardPayment,
        }
    }

    #[test]
    fn test_create_sets_id_status_timestamp() {
        let mut orders = store();
        let order = orders.create(draft("usr_1", 1000)).unwrap();

        assert!(order.id.as_str().starts_with("ORD-"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Price::eur_cents(1000));
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn test_total_is_snapshot_not_recomputed() {
        let mut orders = store();
        // The caller-supplied total is trusted even when it disagrees with
        // the lines; the store records, it does not audit.
        let order = orders.create(draft("usr_1", 999)).unwrap();
        assert_eq!(order.total, Price::eur_cents(999));
        assert_eq!(order.items[0].price, Price::eur_cents(500));
        assert_eq!(order.items[0].qty, 2);
    }

    #[test]
    fn test_user_orders_most_recent_first() {
        let mut orders = store();
        let first = orders.create(draft("usr_1", 100)).unwrap();
        let second = orders.create(draft("usr_1", 200)).unwrap();
        orders.create(draft("usr_2", 300)).unwrap();

        let mine = orders.user_orders(&UserId::new("usr_1"));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id);
        assert_eq!(mine[1].id, first.id);
    }

    #[test]
    fn test_user_orders_empty_for_unknown_user() {
        let orders = store();
        assert!(orders.user_orders(&UserId::new("usr_nobody")).is_empty());
    }

    #[test]
    fn test_history_survives_reload() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let id = {
            let mut orders = OrdersStore::load(Arc::clone(&kv)).unwrap();
            orders.create(draft("usr_1", 100)).unwrap().id
        };
        let orders = OrdersStore::load(kv).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders.orders()[0].id, id);
    }
}
