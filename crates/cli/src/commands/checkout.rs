//! Checkout command.

use farine_core::PaymentMethod;
use farine_store::{AppState, CheckoutError, CheckoutRequest};

/// Delivery details collected from command-line flags.
pub struct CheckoutArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub payment: PaymentMethod,
}

/// Place an order from the current cart.
///
/// # Errors
///
/// Returns a [`CheckoutError`] for an empty cart, invalid delivery input,
/// or persistence failures.
pub async fn run(state: &mut AppState, args: CheckoutArgs) -> Result<(), CheckoutError> {
    tracing::info!("Processing payment...");
    let order = state
        .checkout(CheckoutRequest {
            name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            zip: args.zip,
            payment_method: args.payment,
        })
        .await?;

    tracing::info!("Order confirmed: {}", order.id);
    for line in &order.items {
        tracing::info!("  {} {} x{} = {}", line.emoji, line.product_name, line.qty, line.price.times(line.qty));
    }
    tracing::info!("Total paid: {}", order.total);
    tracing::info!("Confirmation will be sent to {}", order.user_email);
    Ok(())
}
