//! Persistence across store re-construction, over both backends, plus the
//! on-disk document shapes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use farine_core::ProductId;
use farine_integration_tests::checkout_request;
use farine_store::{AppState, Catalog, JsonFileStore, KeyValueStore, MemoryStore};

#[tokio::test(start_paused = true)]
async fn full_state_survives_reload_over_memory_backend() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    {
        let mut state = AppState::load(Arc::clone(&kv), Catalog::demo()).unwrap();
        state
            .auth
            .register("Ana", "ana@x.com", "secret-123")
            .unwrap();
        state.cart.add(ProductId::new("eclair-cafe"), 2).unwrap();
        state
            .checkout(checkout_request("Ana", "ana@x.com"))
            .await
            .unwrap();
        state.cart.add_one(ProductId::new("mille-feuille")).unwrap();
    }

    let state = AppState::load(kv, Catalog::demo()).unwrap();
    assert!(state.auth.is_logged_in());
    assert_eq!(state.cart.count(), 1);
    assert_eq!(state.orders.len(), 1);
    // Toasts are deliberately not persisted: the queue starts empty.
    assert!(state.toasts.active().is_empty());
}

#[test]
fn file_backend_persists_across_handles() {
    let dir = tempfile::tempdir().unwrap();

    {
        let kv = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let mut state = AppState::load(kv, Catalog::demo()).unwrap();
        state.cart.add(ProductId::new("pain-au-chocolat"), 4).unwrap();
        state.auth.seed_demo().unwrap();
    }

    let kv = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let mut state = AppState::load(kv, Catalog::demo()).unwrap();
    assert_eq!(state.cart.count(), 4);
    assert!(state.auth.login("demo@farine.com", "demo1234").is_ok());
}

#[test]
fn persisted_documents_use_fixed_keys_and_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let kv = Arc::new(JsonFileStore::open(dir.path()).unwrap());

    let mut state = AppState::load(kv, Catalog::demo()).unwrap();
    state.cart.add(ProductId::new("eclair-cafe"), 2).unwrap();
    state
        .auth
        .register("Ana", "ana@x.com", "secret-123")
        .unwrap();

    let cart_doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("farine_cart.json")).unwrap())
            .unwrap();
    let items = cart_doc["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], "eclair-cafe");
    assert_eq!(items[0]["qty"], 2);

    let auth_doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("farine_auth.json")).unwrap())
            .unwrap();
    assert_eq!(auth_doc["user"]["email"], "ana@x.com");
    assert_eq!(auth_doc["users"].as_array().unwrap().len(), 1);
    // The session projection never carries the hash; the registry does.
    assert!(auth_doc["user"].get("password_hash").is_none());
    assert!(auth_doc["users"][0].get("password_hash").is_some());
}

#[test]
fn missing_documents_yield_default_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let kv = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let state = AppState::load(kv, Catalog::demo()).unwrap();

    assert!(state.cart.is_empty());
    assert!(!state.auth.is_logged_in());
    assert_eq!(state.auth.user_count(), 0);
    assert!(state.orders.is_empty());
}
