//! Import session: select → preview → map → commit.
//!
//! An [`ImportSession`] owns everything read from the file. Nothing reaches
//! the [`RecordStore`] or the persistence store before [`ImportSession::commit`];
//! dropping the session at any earlier stage discards the attempt.

mod commit;
mod transform;

pub use commit::ImportOutcome;
pub use transform::{
    GENERATED_ID_PREFIX, RequiredFieldPolicy, RowFailure, RowIssue, TransformResult, generate_id,
    transform_rows,
};

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span};

use claims_ingest::{
    CsvTable, FilePreview, ImportSource, ReadOptions, build_preview, parse_csv_text,
    read_import_file,
};
use claims_map::{DEFAULT_MIN_CONFIDENCE, ImportMapping, SuggestionResult, suggest_mapping};
use claims_model::{ImportCounts, ImportHistoryEntry};
use claims_standards::SchemaRegistry;

use crate::error::ImportError;
use crate::record_store::RecordStore;
use crate::storage::KeyValueStore;

/// Where an import session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Selected,
    Previewed,
    Mapped,
    Committing,
    Committed,
    Failed,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Selected => "selected",
            ImportStage::Previewed => "previewed",
            ImportStage::Mapped => "mapped",
            ImportStage::Committing => "committing",
            ImportStage::Committed => "committed",
            ImportStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStage::Committed | ImportStage::Failed)
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables of the import pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    pub read: ReadOptions,
    /// Minimum similarity for a fuzzy mapping suggestion.
    pub suggest_min_confidence: f32,
    pub required: RequiredFieldPolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            read: ReadOptions::default(),
            suggest_min_confidence: DEFAULT_MIN_CONFIDENCE,
            required: RequiredFieldPolicy::default(),
        }
    }
}

/// Facts about the commit supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportContext {
    pub now: DateTime<Utc>,
    /// Operator email recorded in the history entry.
    pub email: Option<String>,
}

impl ImportContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now, email: None }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.email = (!email.trim().is_empty()).then_some(email);
        self
    }
}

/// One import attempt.
#[derive(Debug)]
pub struct ImportSession {
    stage: ImportStage,
    options: ImportOptions,
    source: ImportSource,
    table: Option<CsvTable>,
    mapping: Option<ImportMapping>,
}

impl ImportSession {
    /// Session over content already in memory.
    pub fn new(source: ImportSource) -> Self {
        Self::with_options(source, ImportOptions::default())
    }

    pub fn with_options(source: ImportSource, options: ImportOptions) -> Self {
        Self {
            stage: ImportStage::Selected,
            options,
            source,
            table: None,
            mapping: None,
        }
    }

    /// Read `path` with the file checks of `options`.
    pub fn open(path: &Path, options: &ImportOptions) -> Result<Self, ImportError> {
        let source = read_import_file(path, &options.read)?;
        Ok(Self::with_options(source, *options))
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn source(&self) -> &ImportSource {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.source.filename
    }

    pub fn table(&self) -> Option<&CsvTable> {
        self.table.as_ref()
    }

    pub fn mapping(&self) -> Option<&ImportMapping> {
        self.mapping.as_ref()
    }

    fn expect_stage(
        &self,
        operation: &'static str,
        allowed: &[ImportStage],
    ) -> Result<(), ImportError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(ImportError::InvalidStage {
                operation,
                stage: self.stage,
            })
        }
    }

    fn parsed_table(&self, operation: &'static str) -> Result<&CsvTable, ImportError> {
        self.table.as_ref().ok_or(ImportError::InvalidStage {
            operation,
            stage: self.stage,
        })
    }

    /// Parse the content and describe it. A parse failure ends the session.
    pub fn preview(&mut self, registry: &SchemaRegistry) -> Result<FilePreview, ImportError> {
        self.expect_stage(
            "preview",
            &[
                ImportStage::Selected,
                ImportStage::Previewed,
                ImportStage::Mapped,
            ],
        )?;
        if self.table.is_none() {
            match parse_csv_text(&self.source.content, &self.source.filename) {
                Ok(table) => {
                    debug!(
                        file = %self.source.filename,
                        columns = table.headers.len(),
                        rows = table.row_count(),
                        "parsed import file"
                    );
                    self.table = Some(table);
                    self.stage = ImportStage::Previewed;
                }
                Err(err) => {
                    self.stage = ImportStage::Failed;
                    return Err(err.into());
                }
            }
        }
        let table = self.parsed_table("preview")?;
        Ok(build_preview(table, registry))
    }

    /// Suggested mapping for the parsed headers.
    pub fn suggest(&self, registry: &SchemaRegistry) -> Result<SuggestionResult, ImportError> {
        let table = self.parsed_table("suggest a mapping")?;
        Ok(suggest_mapping(
            &table.headers,
            registry,
            self.options.suggest_min_confidence,
        ))
    }

    /// Accept the column mapping. Every mapped source must be a file header.
    pub fn set_mapping(&mut self, mapping: ImportMapping) -> Result<(), ImportError> {
        self.expect_stage("map", &[ImportStage::Previewed, ImportStage::Mapped])?;
        let table = self.parsed_table("map")?;
        mapping.validate_against(&table.headers)?;
        self.mapping = Some(mapping);
        self.stage = ImportStage::Mapped;
        Ok(())
    }

    /// Transform, validate and commit every data row.
    ///
    /// Row problems do not fail the commit; they are reported in the
    /// outcome. A persistence failure leaves `records` untouched and ends
    /// the session in [`ImportStage::Failed`].
    pub fn commit(
        &mut self,
        records: &mut RecordStore,
        storage: &mut dyn KeyValueStore,
        registry: &SchemaRegistry,
        context: &ImportContext,
    ) -> Result<ImportOutcome, ImportError> {
        self.expect_stage("commit", &[ImportStage::Mapped])?;
        let span = info_span!("import", file = %self.source.filename);
        let _enter = span.enter();

        self.stage = ImportStage::Committing;
        let (Some(table), Some(mapping)) = (self.table.as_ref(), self.mapping.as_ref()) else {
            self.stage = ImportStage::Failed;
            return Err(ImportError::InvalidStage {
                operation: "commit",
                stage: ImportStage::Mapped,
            });
        };

        let batch = transform_rows(
            table,
            mapping,
            registry,
            self.options.required,
            |id| records.contains_id(id),
            context.now,
        );
        let counts = ImportCounts {
            processed: batch.records.len(),
            failed: batch.failures.len(),
            total: batch.total(),
        };
        let history = ImportHistoryEntry::new(&self.source.filename, counts, context.now)
            .with_email(context.email.clone())
            .with_source_sha256(&self.source.sha256);

        match commit::commit_batch(batch, history, records, storage) {
            Ok(outcome) => {
                self.stage = ImportStage::Committed;
                Ok(outcome)
            }
            Err(err) => {
                self.stage = ImportStage::Failed;
                Err(err.into())
            }
        }
    }

    /// Abandon the attempt. Nothing has been written.
    pub fn cancel(self) {
        info!(file = %self.source.filename, stage = %self.stage, "import cancelled");
    }
}

/// Preview, map and commit `source` in one call.
pub fn run_import(
    source: ImportSource,
    options: ImportOptions,
    mapping: ImportMapping,
    records: &mut RecordStore,
    storage: &mut dyn KeyValueStore,
    registry: &SchemaRegistry,
    context: &ImportContext,
) -> Result<ImportOutcome, ImportError> {
    let mut session = ImportSession::with_options(source, options);
    session.preview(registry)?;
    session.set_mapping(mapping)?;
    session.commit(records, storage, registry, context)
}
