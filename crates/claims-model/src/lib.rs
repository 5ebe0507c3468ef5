pub mod claim;
pub mod error;
pub mod field;
pub mod history;

pub use claim::{ClaimRecord, ClaimStatus};
pub use error::{ModelError, Result};
pub use field::{FieldKey, FieldValue, format_numeric};
pub use history::{IMPORT_MODULE_NAME, ImportCounts, ImportHistoryEntry, ImportStatus};
