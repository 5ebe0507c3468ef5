//! Writing an import to the record store and persistence.

use serde::Serialize;
use tracing::{info, warn};

use claims_model::{ClaimRecord, ImportCounts, ImportHistoryEntry};

use super::transform::{RowFailure, TransformResult};
use crate::error::PersistenceError;
use crate::record_store::RecordStore;
use crate::storage::{
    IMPORTED_CLAIMS_KEY, KeyValueStore, load_imported_claims, prepend_history_entry,
    save_imported_claims,
};

/// Result of a committed import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub counts: ImportCounts,
    pub failures: Vec<RowFailure>,
    pub imported_ids: Vec<String>,
    pub history: ImportHistoryEntry,
}

impl ImportOutcome {
    /// Completion message shown to the operator.
    pub fn message(&self) -> String {
        if self.counts.failed == 0 {
            format!("Successfully imported {} claims", self.counts.processed)
        } else {
            format!("Imported claims: {}", self.counts.summary())
        }
    }
}

/// Persist and append a transformed batch.
///
/// Storage is written first (claims, then history). The new records are
/// appended to the claims already persisted, whatever `records` holds. When
/// the history write fails the previous claims value is put back and
/// `records` is left as it was.
pub(crate) fn commit_batch(
    batch: TransformResult,
    history: ImportHistoryEntry,
    records: &mut RecordStore,
    storage: &mut dyn KeyValueStore,
) -> Result<ImportOutcome, PersistenceError> {
    let TransformResult {
        records: new_records,
        failures,
    } = batch;
    let counts = history.counts();

    let previous = storage.get(IMPORTED_CLAIMS_KEY)?;
    let mut imported: Vec<ClaimRecord> = load_imported_claims(storage)?;
    imported.extend(new_records.iter().cloned());
    save_imported_claims(storage, &imported)?;

    if let Err(err) = prepend_history_entry(storage, &history) {
        let restored = match previous {
            Some(text) => storage.put(IMPORTED_CLAIMS_KEY, &text),
            None => storage.remove(IMPORTED_CLAIMS_KEY),
        };
        if let Err(restore_err) = restored {
            warn!(
                error = %restore_err,
                "failed to restore imported claims after history write failure"
            );
        }
        return Err(err);
    }

    let imported_ids: Vec<String> = new_records.iter().map(|r| r.id.clone()).collect();
    records.append(new_records);
    info!(
        processed = counts.processed,
        failed = counts.failed,
        total = counts.total,
        "import committed"
    );

    Ok(ImportOutcome {
        counts,
        failures,
        imported_ids,
        history,
    })
}
