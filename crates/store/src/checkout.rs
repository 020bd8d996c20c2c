//! Checkout orchestration.
//!
//! The one flow that crosses store boundaries: read the cart and the
//! session, snapshot cart lines against the catalog, record the order,
//! then clear the cart. Payment is simulated by a fixed pause that always
//! succeeds; once started it is never cancelled.

use std::time::Duration;

use thiserror::Error;

use farine_core::{Email, EmailError, UserId};

use crate::auth::AuthStore;
use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::orders::{DeliveryAddress, Order, OrderDraft, OrderLine, OrdersStore};
use crate::persist::StorageError;

/// Fixed duration of the simulated payment.
pub const PAYMENT_DELAY: Duration = Duration::from_millis(2000);

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No cart line resolves against the catalog.
    #[error("cart is empty")]
    EmptyCart,

    /// A required delivery field is blank.
    #[error("missing delivery field: {0}")]
    MissingField(&'static str),

    /// The delivery email does not parse.
    #[error("invalid delivery email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Persistence error from the cart or orders store.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Raw checkout form input, validated by [`CheckoutService::place_order`].
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Recipient name. Required.
    pub name: String,
    /// Contact email. Required, must parse.
    pub email: String,
    /// Contact phone. Optional, stored as entered.
    pub phone: String,
    /// Street address. Required.
    pub address: String,
    /// City. Required.
    pub city: String,
    /// Postal code. Required.
    pub zip: String,
    /// Selected payment method.
    pub payment_method: farine_core::PaymentMethod,
}

/// Checkout service over a catalog snapshot.
pub struct CheckoutService<'a> {
    catalog: &'a Catalog,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service reading the given catalog.
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Place an order from the current cart.
    ///
    /// Cart lines whose product id no longer resolves are dropped from the
    /// snapshot (and contribute nothing to the total). The purchaser
    /// identity is the active session's user, or the guest sentinel when
    /// signed out; the contact name/email on the order come from the
    /// delivery form either way. On success the cart is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when nothing resolvable is in
    /// the cart, a validation error for bad delivery input, or a storage
    /// error from persisting.
    pub async fn place_order(
        &self,
        request: CheckoutRequest,
        cart: &mut CartStore,
        auth: &AuthStore,
        orders: &mut OrdersStore,
    ) -> Result<Order, CheckoutError> {
        let items: Vec<OrderLine> = cart
            .items()
            .iter()
            .filter_map(|line| {
                self.catalog.get(&line.product_id).map(|p| OrderLine {
                    product_id: p.id.clone(),
                    product_name: p.name.clone(),
                    emoji: p.emoji.clone(),
                    price: p.price,
                    qty: line.qty,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let delivery = validate_delivery(&request)?;
        let total = cart.total(self.catalog);

        let user_id = auth
            .current_user()
            .map_or_else(UserId::guest, |s| s.id.clone());

        tracing::debug!(user_id = %user_id, lines = items.len(), "processing payment");
        tokio::time::sleep(PAYMENT_DELAY).await;

        let order = orders.create(OrderDraft {
            user_id,
            user_name: delivery.name.clone(),
            user_email: delivery.email.clone(),
            items,
            total,
            delivery,
            payment_method: request.payment_method,
        })?;

        cart.clear()?;
        Ok(order)
    }
}

/// Check required delivery fields and parse the contact email.
fn validate_delivery(request: &CheckoutRequest) -> Result<DeliveryAddress, CheckoutError> {
    let required = |value: &str, field: &'static str| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(CheckoutError::MissingField(field))
        } else {
            Ok(trimmed.to_owned())
        }
    };

    Ok(DeliveryAddress {
        name: required(&request.name, "name")?,
        email: Email::parse(&request.email)?,
        phone: request.phone.trim().to_owned(),
        address: required(&request.address, "address")?,
        city: required(&request.city, "city")?,
        zip: required(&request.zip, "zip")?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use farine_core::{PaymentMethod, Price, ProductId};

    use crate::persist::{KeyValueStore, MemoryStore};

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            name: "Ana".to_owned(),
            email: "ana@x.com".to_owned(),
            phone: String::new(),
            address: "1 Rue du Four".to_owned(),
            city: "Lyon".to_owned(),
            zip: "69001".to_owned(),
            payment_method: PaymentMethod::CardPayment,
        }
    }

    fn stores() -> (CartStore, AuthStore, OrdersStore) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (
            CartStore::load(Arc::clone(&kv)).unwrap(),
            AuthStore::load(Arc::clone(&kv)).unwrap(),
            OrdersStore::load(kv).unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_snapshots_and_clears_cart() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        cart.add(ProductId::new("eclair-cafe"), 2).unwrap();

        let order = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap();

        assert_eq!(order.total, Price::eur_cents(700));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_name, "Éclair au Café");
        assert!(cart.is_empty());
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_guest_checkout_uses_sentinel() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        cart.add_one(ProductId::new("baguette-tradition")).unwrap();

        let order = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap();
        assert_eq!(order.user_id, UserId::guest());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_in_checkout_uses_session_user() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, mut auth, mut orders) = stores();

        let session = auth.register("Ana", "ana@x.com", "secret-123").unwrap();
        cart.add_one(ProductId::new("baguette-tradition")).unwrap();

        let order = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap();
        assert_eq!(order.user_id, session.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_rejected() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        let err = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_of_only_stale_lines_is_empty() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        cart.add(ProductId::new("discontinued-item"), 3).unwrap();

        let err = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        // The unresolvable cart is left alone for the caller to handle.
        assert_eq!(cart.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_delivery_fields_rejected() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        cart.add_one(ProductId::new("baguette-tradition")).unwrap();

        let mut bad = request();
        bad.city = "  ".to_owned();

        let err = service
            .place_order(bad, &mut cart, &auth, &mut orders)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingField("city")));

        let mut bad = request();
        bad.email = "not-an-email".to_owned();
        let err = service
            .place_order(bad, &mut cart, &auth, &mut orders)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidEmail(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_lines_are_frozen_copies() {
        let catalog = Catalog::demo();
        let service = CheckoutService::new(&catalog);
        let (mut cart, auth, mut orders) = stores();

        cart.add(ProductId::new("eclair-cafe"), 1).unwrap();
        let order = service
            .place_order(request(), &mut cart, &auth, &mut orders)
            .await
            .unwrap();

        // The order carries its own copies of name, emoji, and price; it
        // does not reference the catalog at all after creation.
        assert_eq!(order.items[0].price, Price::eur_cents(350));
        assert_eq!(order.items[0].emoji, "☕");
        assert_eq!(order.items[0].product_name, "Éclair au Café");
    }
}
