//! Key-value persistence of imported claims and the import history.
//!
//! The store holds JSON text under two keys. Values are read and written
//! whole; there are no partial updates.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use claims_model::{ClaimRecord, ImportHistoryEntry};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PersistenceError, Result};

/// Key of the imported claims collection.
pub const IMPORTED_CLAIMS_KEY: &str = "importedClaims";

/// Key of the import history log (newest entry first).
pub const IMPORT_HISTORY_KEY: &str = "importHistory";

/// Synchronous string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    /// Remove a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(key.to_string()))
    }
}

fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| PersistenceError::Json {
            key: key.to_string(),
            source,
        })
}

fn put_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let text = serde_json::to_string(value).map_err(|source| PersistenceError::Json {
        key: key.to_string(),
        source,
    })?;
    store.put(key, &text)
}

/// Imported claims in commit order. Missing key means none.
pub fn load_imported_claims(store: &dyn KeyValueStore) -> Result<Vec<ClaimRecord>> {
    Ok(get_json(store, IMPORTED_CLAIMS_KEY)?.unwrap_or_default())
}

pub fn save_imported_claims(store: &mut dyn KeyValueStore, claims: &[ClaimRecord]) -> Result<()> {
    put_json(store, IMPORTED_CLAIMS_KEY, claims)
}

/// Import history, newest first, truncated to `limit` entries when given.
pub fn load_import_history(
    store: &dyn KeyValueStore,
    limit: Option<usize>,
) -> Result<Vec<ImportHistoryEntry>> {
    let mut history: Vec<ImportHistoryEntry> =
        get_json(store, IMPORT_HISTORY_KEY)?.unwrap_or_default();
    if let Some(limit) = limit {
        history.truncate(limit);
    }
    Ok(history)
}

/// Put `entry` at the front of the history log.
pub fn prepend_history_entry(
    store: &mut dyn KeyValueStore,
    entry: &ImportHistoryEntry,
) -> Result<()> {
    let mut history = load_import_history(store, None)?;
    history.insert(0, entry.clone());
    put_json(store, IMPORT_HISTORY_KEY, &history)
}
