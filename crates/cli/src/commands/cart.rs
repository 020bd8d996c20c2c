//! Cart manipulation commands.

use farine_core::ProductId;
use farine_store::{AppState, StorageError};

/// Add `qty` units of a product to the cart.
///
/// # Errors
///
/// Returns a [`StorageError`] if persisting fails.
pub fn add(state: &mut AppState, product_id: &str, qty: u32) -> Result<(), StorageError> {
    let product_id = ProductId::new(product_id);
    if state.catalog.get(&product_id).is_none() {
        tracing::warn!(product_id = %product_id, "product not in catalog; adding anyway");
    }
    state.cart.add(product_id, qty)?;
    tracing::info!("{} items in cart", state.cart.count());
    Ok(())
}

/// Remove a product's line from the cart.
///
/// # Errors
///
/// Returns a [`StorageError`] if persisting fails.
pub fn remove(state: &mut AppState, product_id: &str) -> Result<(), StorageError> {
    state.cart.remove(&ProductId::new(product_id))?;
    tracing::info!("{} items in cart", state.cart.count());
    Ok(())
}

/// Set the quantity of an existing line (0 removes it).
///
/// # Errors
///
/// Returns a [`StorageError`] if persisting fails.
pub fn set_qty(state: &mut AppState, product_id: &str, qty: u32) -> Result<(), StorageError> {
    state.cart.set_qty(&ProductId::new(product_id), qty)?;
    tracing::info!("{} items in cart", state.cart.count());
    Ok(())
}

/// Show the cart lines and total.
pub fn list(state: &AppState) {
    if state.cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }
    for line in state.cart.items() {
        match state.catalog.get(&line.product_id) {
            Some(p) => tracing::info!(
                "  {} {} x{} = {}",
                p.emoji,
                p.name,
                line.qty,
                p.price.times(line.qty)
            ),
            None => tracing::info!("  {} x{} (no longer in catalog)", line.product_id, line.qty),
        }
    }
    tracing::info!(
        "Total: {} ({} items)",
        state.cart.total(&state.catalog),
        state.cart.count()
    );
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a [`StorageError`] if persisting fails.
pub fn clear(state: &mut AppState) -> Result<(), StorageError> {
    state.cart.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
