//! Catalog browsing commands.

use farine_store::AppState;

/// List every product in the catalog.
pub fn list(state: &AppState) {
    tracing::info!("{} products", state.catalog.len());
    for p in state.catalog.products() {
        tracing::info!(
            "  {} {} [{}] - {} ({}, {} in stock)",
            p.emoji,
            p.name,
            p.id,
            p.price,
            p.category,
            p.stock
        );
    }
}
