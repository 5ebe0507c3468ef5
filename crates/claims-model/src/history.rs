//! Import audit log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Module name recorded on every claims import.
pub const IMPORT_MODULE_NAME: &str = "Claims";

/// Outcome of a committed import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// At least one row was committed, or the file had nothing to reject.
    Completed,
    /// Every data row failed validation.
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Completed => "completed",
            ImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportCounts {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
}

impl ImportCounts {
    pub fn status(&self) -> ImportStatus {
        if self.total > 0 && self.failed == self.total {
            ImportStatus::Failed
        } else {
            ImportStatus::Completed
        }
    }

    /// Human-readable summary, e.g. `"8 processed, 2 failed, 10 total"`.
    pub fn summary(&self) -> String {
        format!(
            "{} processed, {} failed, {} total",
            self.processed, self.failed, self.total
        )
    }
}

/// Append-only audit record written once per committed import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportHistoryEntry {
    /// Milliseconds since the Unix epoch at commit time.
    pub id: i64,
    pub module_name: String,
    pub original_filename: String,
    pub processed_records: usize,
    pub failed_records: usize,
    pub total_records: usize,
    pub upload_status: ImportStatus,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// SHA-256 of the imported file content (lowercase hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
}

impl ImportHistoryEntry {
    pub fn new(
        original_filename: impl Into<String>,
        counts: ImportCounts,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: at.timestamp_millis(),
            module_name: IMPORT_MODULE_NAME.to_string(),
            original_filename: original_filename.into(),
            processed_records: counts.processed,
            failed_records: counts.failed,
            total_records: counts.total,
            upload_status: counts.status(),
            uploaded_at: at,
            email: None,
            source_sha256: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_source_sha256(mut self, hash: impl Into<String>) -> Self {
        self.source_sha256 = Some(hash.into());
        self
    }

    pub fn counts(&self) -> ImportCounts {
        ImportCounts {
            processed: self.processed_records,
            failed: self.failed_records,
            total: self.total_records,
        }
    }
}
