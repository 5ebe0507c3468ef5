//! The working set of claims: built-in records plus everything imported.

use std::collections::HashSet;

use tracing::{info, warn};

use claims_model::ClaimRecord;

use crate::error::PersistenceError;
use crate::storage::{
    IMPORT_HISTORY_KEY, IMPORTED_CLAIMS_KEY, KeyValueStore, load_imported_claims,
};

/// Append-only claim collection with unique ids.
///
/// Base records come first, imported records follow in commit order. Only
/// the import pipeline appends; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ClaimRecord>,
    base_len: usize,
    ids: HashSet<String>,
}

impl RecordStore {
    /// Store holding only base records. Later duplicates of an id are dropped.
    pub fn new(base: Vec<ClaimRecord>) -> Self {
        let mut store = Self::default();
        store.push_unique(base);
        store.base_len = store.records.len();
        store
    }

    /// Base records plus previously imported ones.
    pub fn with_imported(base: Vec<ClaimRecord>, imported: Vec<ClaimRecord>) -> Self {
        let mut store = Self::new(base);
        store.push_unique(imported);
        store
    }

    /// Base records plus the imported claims held by `storage`.
    pub fn open(
        base: Vec<ClaimRecord>,
        storage: &dyn KeyValueStore,
    ) -> Result<Self, PersistenceError> {
        let imported = load_imported_claims(storage)?;
        Ok(Self::with_imported(base, imported))
    }

    fn push_unique(&mut self, records: Vec<ClaimRecord>) {
        for record in records {
            if self.ids.insert(record.id.clone()) {
                self.records.push(record);
            } else {
                warn!(id = %record.id, "skipping record with duplicate id");
            }
        }
    }

    pub fn records(&self) -> &[ClaimRecord] {
        &self.records
    }

    pub fn base(&self) -> &[ClaimRecord] {
        &self.records[..self.base_len]
    }

    pub fn imported(&self) -> &[ClaimRecord] {
        &self.records[self.base_len..]
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&ClaimRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append validated records. Callers guarantee the ids are new.
    pub(crate) fn append(&mut self, records: Vec<ClaimRecord>) {
        self.push_unique(records);
    }

    pub(crate) fn drop_imported(&mut self) {
        for record in self.records.drain(self.base_len..) {
            self.ids.remove(&record.id);
        }
    }
}

/// Remove every imported claim and the import history, from storage and
/// from `records`. Base records stay.
///
/// History goes first, so a failure leaves the persisted claims and
/// `records` in agreement.
pub fn clear_imported_data(
    records: &mut RecordStore,
    storage: &mut dyn KeyValueStore,
) -> Result<(), PersistenceError> {
    storage.remove(IMPORT_HISTORY_KEY)?;
    storage.remove(IMPORTED_CLAIMS_KEY)?;
    let removed = records.imported().len();
    records.drop_imported();
    info!(removed, "cleared imported claims and history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, load_import_history, save_imported_claims};

    fn claims(ids: &[&str]) -> Vec<ClaimRecord> {
        ids.iter().map(|id| ClaimRecord::new(*id)).collect()
    }

    #[test]
    fn base_then_imported() {
        let store = RecordStore::with_imported(claims(&["A", "B"]), claims(&["C"]));
        assert_eq!(store.len(), 3);
        assert_eq!(store.base().len(), 2);
        assert_eq!(store.imported()[0].id, "C");
        assert!(store.contains_id("C"));
    }

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let store = RecordStore::with_imported(claims(&["A", "B"]), claims(&["B", "C"]));
        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn open_reads_imported_claims() {
        let mut storage = MemoryStore::new();
        save_imported_claims(&mut storage, &claims(&["X1", "X2"])).unwrap();
        let store = RecordStore::open(claims(&["A"]), &storage).unwrap();
        assert_eq!(store.imported().len(), 2);
    }

    #[test]
    fn dropping_imported_keeps_base() {
        let mut store = RecordStore::with_imported(claims(&["A"]), claims(&["B"]));
        store.drop_imported();
        assert_eq!(store.len(), 1);
        assert!(!store.contains_id("B"));
        store.append(claims(&["B"]));
        assert_eq!(store.imported().len(), 1);
    }

    #[test]
    fn clearing_removes_storage_keys() {
        let mut storage = MemoryStore::new();
        save_imported_claims(&mut storage, &claims(&["X1"])).unwrap();
        storage.put(IMPORT_HISTORY_KEY, "[]").unwrap();
        let mut store = RecordStore::open(claims(&["A"]), &storage).unwrap();

        clear_imported_data(&mut store, &mut storage).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(storage.keys().count(), 0);
        assert!(load_import_history(&storage, None).unwrap().is_empty());
    }

    struct ClaimsRemovalFails {
        inner: MemoryStore,
    }

    impl KeyValueStore for ClaimsRemovalFails {
        fn get(&self, key: &str) -> crate::Result<Option<String>> {
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, value: &str) -> crate::Result<()> {
            self.inner.put(key, value)
        }

        fn remove(&mut self, key: &str) -> crate::Result<()> {
            if key == IMPORTED_CLAIMS_KEY {
                return Err(PersistenceError::Io {
                    operation: "remove",
                    path: std::path::PathBuf::from("importedClaims.json"),
                    source: std::io::Error::other("read-only"),
                });
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_clear_keeps_claims_in_step() {
        let mut inner = MemoryStore::new();
        save_imported_claims(&mut inner, &claims(&["X1"])).unwrap();
        inner.put(IMPORT_HISTORY_KEY, "[]").unwrap();
        let mut storage = ClaimsRemovalFails { inner };
        let mut store = RecordStore::open(claims(&["A"]), &storage).unwrap();

        assert!(clear_imported_data(&mut store, &mut storage).is_err());
        assert!(store.contains_id("X1"));
        let persisted = load_imported_claims(&storage).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(storage.get(IMPORT_HISTORY_KEY).unwrap(), None);
    }
}
