//! Order history commands.

use farine_core::UserId;
use farine_store::AppState;

/// List the current user's orders, most recent first. When signed out this
/// lists guest orders.
pub fn list(state: &AppState) {
    let user_id = state
        .auth
        .current_user()
        .map_or_else(UserId::guest, |s| s.id.clone());

    let orders = state.orders.user_orders(&user_id);
    if orders.is_empty() {
        tracing::info!("No orders for {user_id}");
        return;
    }

    for order in &orders {
        tracing::info!(
            "{} - {} - {} ({} lines, {})",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.total,
            order.items.len(),
            order.status
        );
        for line in &order.items {
            tracing::info!("    {} {} x{} = {}", line.emoji, line.product_name, line.qty, line.price.times(line.qty));
        }
    }
}
