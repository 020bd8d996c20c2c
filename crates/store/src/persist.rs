//! Store persistence adapter.
//!
//! Each persistent store serializes its full state to a JSON document under
//! a fixed key and writes it back after every mutation (whole-document
//! overwrite, not incremental). A missing key yields the store's default
//! empty state on load.
//!
//! The [`KeyValueStore`] trait is the only seam the stores see; backends are
//! injected at construction so tests run against [`MemoryStore`] while the
//! CLI uses [`JsonFileStore`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed document keys, one per persistent store.
pub mod keys {
    /// Auth registry and current session.
    pub const FARINE_AUTH: &str = "farine_auth";

    /// Cart line items.
    pub const FARINE_CART: &str = "farine_cart";

    /// Completed orders.
    pub const FARINE_ORDERS: &str = "farine_orders";
}

/// Errors raised by a persistence backend or by (de)serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write the document.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The document could not be serialized or deserialized.
    #[error("invalid persisted document: {0}")]
    Document(#[from] serde_json::Error),
}

/// A durable string-keyed document store, synchronous from the stores'
/// perspective.
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load a store's state from the backend, or `None` if the key is absent.
///
/// # Errors
///
/// Returns [`StorageError::Document`] if the stored JSON does not match `T`,
/// or a backend error from the read.
pub fn load<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match kv.get(key)? {
        Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
        None => Ok(None),
    }
}

/// Serialize a store's full state and write it to the backend.
///
/// # Errors
///
/// Returns a serialization or backend error.
pub fn save<T: Serialize>(kv: &dyn KeyValueStore, key: &str, state: &T) -> Result<(), StorageError> {
    let doc = serde_json::to_string(state)?;
    kv.set(key, &doc)
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("poisoned lock".to_owned()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Backend("poisoned lock".to_owned()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// File-backed backend: one `<key>.json` document per key under a data
/// directory. Used by the CLI so state survives across invocations.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a file store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Backend(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Backend(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        write_atomic(&path, value)
            .map_err(|e| StorageError::Backend(format!("write {}: {e}", path.display())))
    }
}

/// Write via a sibling temp file and rename, so a crash mid-write never
/// leaves a truncated document behind.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}
