use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tracing::{debug, info, info_span, trace};

use claims_cli::config::AppConfig;
use claims_cli::logging::redact_value;
use claims_cli::view::{ViewArgs, resolve_column};
use claims_import::{
    FileStore, ImportContext, ImportError, ImportOptions, ImportSession, RecordStore,
    RequiredFieldPolicy, clear_imported_data, load_import_history, transform_rows,
};
use claims_map::{ImportMapping, summarize};
use claims_model::ImportCounts;
use claims_standards::{
    SAMPLE_FILENAME, SchemaRegistry, claims_registry, load_seed_claims, sample_import_csv,
};
use claims_table::{
    ClaimStats, ExportFormat, TableAction, TableViewState, compute_view, distinct_values,
    export_delimited,
};

use crate::cli::{
    ClearArgs, ExportArgs, ExportFormatArg, HistoryArgs, ImportArgs, PreviewArgs, SampleArgs,
    ValuesArgs,
};
use crate::summary::{
    columns_table, failures_table, fields_table, history_table, mapping_table,
    print_claims_page, print_import_outcome, print_mapping_summary, preview_table, stats_table,
};

/// Registry, persistence and the working set of claims.
pub struct Workspace {
    pub config: AppConfig,
    pub registry: SchemaRegistry,
    pub storage: FileStore,
    pub records: RecordStore,
}

impl Workspace {
    pub fn open(config: AppConfig) -> Result<Self> {
        let registry = claims_registry().context("load claims schema")?;
        let base = load_seed_claims().context("load built-in claims")?;
        let storage = FileStore::new(&config.data_dir);
        let records = RecordStore::open(base, &storage)
            .with_context(|| format!("load imported claims from {}", config.data_dir.display()))?;
        debug!(
            records = records.len(),
            imported = records.imported().len(),
            "opened workspace"
        );
        Ok(Self {
            config,
            registry,
            storage,
            records,
        })
    }

    fn view_state(&self, view: &ViewArgs) -> Result<TableViewState> {
        view.to_state(&self.config, &self.registry)
    }

    fn import_options(&self, strict: bool) -> ImportOptions {
        let mut options = self.config.import_options();
        if strict {
            options.required = RequiredFieldPolicy::All;
        }
        options
    }
}

/// Operator-facing message; the full error goes to the log.
fn import_error(err: ImportError) -> anyhow::Error {
    debug!(error = %err, "import step failed");
    anyhow!(err.user_message())
}

pub fn run_list(workspace: &Workspace, args: &ViewArgs) -> Result<()> {
    let state = workspace.view_state(args)?;
    let view = compute_view(workspace.records.records(), &workspace.registry, &state);
    print_claims_page(&view, &state);
    Ok(())
}

pub fn run_export(workspace: &Workspace, args: &ExportArgs) -> Result<()> {
    let mut state = workspace.view_state(&args.view)?;
    for id in &args.select {
        if !workspace.records.contains_id(id) {
            bail!("unknown claim id: {id}");
        }
        state = state.reduce(TableAction::ToggleRowSelection(id.clone()));
    }
    let rows: Vec<_> = state
        .filtered_sorted(workspace.records.records())
        .into_iter()
        .filter(|record| state.selected.is_empty() || state.is_selected(&record.id))
        .collect();
    let columns = state.layout.visible_columns(&workspace.registry);
    let format = match args.format {
        ExportFormatArg::Csv => ExportFormat::Csv,
        ExportFormatArg::Tsv => ExportFormat::Tsv,
    };
    let text = export_delimited(&rows, &columns, format).context("export claims")?;
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
            info!(
                path = %path.display(),
                rows = rows.len(),
                columns = columns.len(),
                %format,
                "exported claims"
            );
            println!("Exported {} claims to {}", rows.len(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

pub fn run_stats(workspace: &Workspace, args: &ViewArgs) -> Result<()> {
    let state = workspace.view_state(args)?;
    let rows = state.filtered_sorted(workspace.records.records());
    let stats = ClaimStats::compute(rows.iter().copied());
    println!("{}", stats_table(&stats));
    if let Some(days) = stats.average_processing_days {
        println!("Average processing time: {days:.1} days");
    }
    Ok(())
}

pub fn run_values(workspace: &Workspace, args: &ValuesArgs) -> Result<()> {
    let key = resolve_column(&workspace.registry, &args.column)?;
    for value in distinct_values(workspace.records.records(), key) {
        println!("{value}");
    }
    Ok(())
}

pub fn run_columns(workspace: &Workspace) -> Result<()> {
    let state = workspace.view_state(&ViewArgs::default())?;
    println!("{}", columns_table(&workspace.registry, &state));
    Ok(())
}

pub fn run_fields() -> Result<()> {
    let registry = claims_registry().context("load claims schema")?;
    println!("{}", fields_table(&registry));
    Ok(())
}

pub fn run_sample(args: &SampleArgs) -> Result<()> {
    let text = sample_import_csv().context("build sample file")?;
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote sample import file to {}", path.display());
        }
        None => {
            debug!(filename = SAMPLE_FILENAME, "writing sample to stdout");
            print!("{text}");
        }
    }
    Ok(())
}

fn open_session(path: &Path, options: &ImportOptions) -> Result<ImportSession> {
    ImportSession::open(path, options)
        .map_err(import_error)
        .with_context(|| format!("open {}", path.display()))
}

pub fn run_preview(workspace: &Workspace, args: &PreviewArgs) -> Result<()> {
    let mut session = open_session(&args.file, &workspace.import_options(false))?;
    let preview = session.preview(&workspace.registry).map_err(import_error)?;
    let suggestions = session.suggest(&workspace.registry)?;
    let mapping = suggestions.to_mapping()?;

    println!("File: {}", session.filename());
    println!("{}", preview_table(&preview));
    println!(
        "Showing {} of {} data rows",
        preview.preview_rows.len(),
        preview.total_rows
    );
    println!();
    println!("Suggested mapping:");
    println!(
        "{}",
        mapping_table(
            &preview.file_columns,
            &mapping,
            &suggestions,
            &workspace.registry
        )
    );
    print_mapping_summary(&summarize(&mapping, &workspace.registry), &workspace.registry);
    session.cancel();
    Ok(())
}

/// Explicit `--map` pairs, topped up with suggestions for `--auto-map`.
fn build_mapping(
    args: &ImportArgs,
    session: &ImportSession,
    registry: &SchemaRegistry,
) -> Result<ImportMapping> {
    let suggested = session.suggest(registry)?.to_mapping()?;
    if args.map.is_empty() {
        return Ok(suggested);
    }
    let mut mapping = ImportMapping::new();
    for raw in &args.map {
        mapping.assign_pair(raw, registry)?;
    }
    if args.auto_map {
        for (source, target) in suggested.iter() {
            if mapping.target_for(source).is_none() && !mapping.is_target_used(target) {
                mapping.assign(source, target)?;
            }
        }
    }
    Ok(mapping)
}

pub fn run_import(workspace: &mut Workspace, args: &ImportArgs) -> Result<()> {
    let span = info_span!("import_command", dry_run = args.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Read and preview
    // =========================================================================
    let options = workspace.import_options(args.strict);
    let mut session = open_session(&args.file, &options)?;
    let preview = session.preview(&workspace.registry).map_err(import_error)?;
    info!(
        file = %session.filename(),
        columns = preview.file_columns.len(),
        rows = preview.total_rows,
        "previewed import file"
    );

    // =========================================================================
    // Stage 2: Map columns
    // =========================================================================
    let mapping = build_mapping(args, &session, &workspace.registry)?;
    let suggestions = session.suggest(&workspace.registry)?;
    println!(
        "{}",
        mapping_table(
            &preview.file_columns,
            &mapping,
            &suggestions,
            &workspace.registry
        )
    );
    print_mapping_summary(&summarize(&mapping, &workspace.registry), &workspace.registry);
    session.set_mapping(mapping).map_err(import_error)?;

    let now = Utc::now();
    if args.dry_run {
        // =====================================================================
        // Stage 3: Validate only
        // =====================================================================
        let (Some(table), Some(mapping)) = (session.table(), session.mapping()) else {
            bail!("import session has no parsed file");
        };
        let batch = transform_rows(
            table,
            mapping,
            &workspace.registry,
            options.required,
            |id| workspace.records.contains_id(id),
            now,
        );
        let counts = ImportCounts {
            processed: batch.records.len(),
            failed: batch.failures.len(),
            total: batch.total(),
        };
        println!("Dry run: {}", counts.summary());
        if !batch.failures.is_empty() {
            println!("{}", failures_table(&batch.failures));
        }
        session.cancel();
        return Ok(());
    }

    // =========================================================================
    // Stage 3: Commit
    // =========================================================================
    let email = args.email.clone().or_else(|| workspace.config.import.email.clone());
    let mut context = ImportContext::new(now);
    if let Some(email) = email {
        context = context.with_email(email);
    }
    let outcome = session
        .commit(
            &mut workspace.records,
            &mut workspace.storage,
            &workspace.registry,
            &context,
        )
        .map_err(import_error)?;
    for id in &outcome.imported_ids {
        if let Some(record) = workspace.records.get(id) {
            trace!(
                id = %record.id,
                patient = redact_value(record.patient_name.as_deref().unwrap_or_default()),
                "imported claim"
            );
        }
    }
    info!(
        processed = outcome.counts.processed,
        failed = outcome.counts.failed,
        duration_ms = start.elapsed().as_millis(),
        "import finished"
    );
    print_import_outcome(&outcome);
    Ok(())
}

pub fn run_history(workspace: &Workspace, args: &HistoryArgs) -> Result<()> {
    let history =
        load_import_history(&workspace.storage, args.limit).context("load import history")?;
    if history.is_empty() {
        println!("No imports yet");
        return Ok(());
    }
    println!("{}", history_table(&history));
    Ok(())
}

pub fn run_clear(workspace: &mut Workspace, args: &ClearArgs) -> Result<()> {
    if !args.yes {
        bail!("refusing to clear imported data without --yes");
    }
    let removed = workspace.records.imported().len();
    clear_imported_data(&mut workspace.records, &mut workspace.storage)
        .context("clear imported data")?;
    println!("Removed {removed} imported claims and the import history");
    Ok(())
}
