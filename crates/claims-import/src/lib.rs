//! Claims import pipeline and the record store it writes to.
//!
//! - `pipeline/` - import session state machine, row transform, commit
//! - `record_store.rs` - base plus imported claims, unique ids, append-only
//! - `storage/` - key-value persistence (memory and directory backed)
//! - `error.rs` - persistence and import errors

mod error;
mod pipeline;
mod record_store;
mod storage;

pub use error::{ImportError, PersistenceError, Result};
pub use pipeline::{
    GENERATED_ID_PREFIX, ImportContext, ImportOptions, ImportOutcome, ImportSession, ImportStage,
    RequiredFieldPolicy, RowFailure, RowIssue, TransformResult, generate_id, run_import,
    transform_rows,
};
pub use record_store::{RecordStore, clear_imported_data};
pub use storage::{
    FileStore, IMPORT_HISTORY_KEY, IMPORTED_CLAIMS_KEY, KeyValueStore, MemoryStore,
    load_import_history, load_imported_claims, prepend_history_entry, save_imported_claims,
};
