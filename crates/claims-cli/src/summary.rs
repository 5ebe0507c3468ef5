use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use claims_import::{ImportOutcome, RowFailure};
use claims_ingest::FilePreview;
use claims_map::{ImportMapping, MappingSummary, SuggestionResult};
use claims_model::{ClaimRecord, ClaimStatus, FieldValue, ImportHistoryEntry, ImportStatus};
use claims_standards::{ColumnDef, ColumnType, SchemaRegistry};
use claims_table::{ClaimStats, TableView, TableViewState};

/// One page of claims with the visible columns.
pub fn claims_table(view: &TableView<'_>, state: &TableViewState) -> Table {
    let mut table = Table::new();
    let header: Vec<Cell> = view
        .columns
        .iter()
        .map(|column| column_header(column, state))
        .collect();
    table.set_header(header);
    apply_table_style(&mut table);
    for (index, column) in view.columns.iter().enumerate() {
        if matches!(column.column_type, ColumnType::Number | ColumnType::Currency) {
            align_column(&mut table, index, CellAlignment::Right);
        }
    }
    for record in &view.rows {
        table.add_row(
            view.columns
                .iter()
                .map(|column| value_cell(record, column))
                .collect::<Vec<_>>(),
        );
    }
    table
}

pub fn print_claims_page(view: &TableView<'_>, state: &TableViewState) {
    println!("{}", claims_table(view, state));
    println!(
        "{} (page {} of {}, {} claims before filtering)",
        view.page.describe(),
        view.page.page,
        view.page.total_pages.max(1),
        view.total_count
    );
}

fn column_header(column: &ColumnDef, state: &TableViewState) -> Cell {
    let mut label = column.title.clone();
    if state.layout.prefs(column.key).pinned {
        label.insert_str(0, "* ");
    }
    if let Some(sort) = state.sort.filter(|sort| sort.key == column.key) {
        label.push(' ');
        label.push_str(sort.direction.icon());
    }
    if state.filters.filtered_columns().contains(&column.key) {
        label.push_str(" (filtered)");
    }
    header_cell(&label)
}

fn value_cell(record: &ClaimRecord, column: &ColumnDef) -> Cell {
    let Some(value) = record.field(column.key) else {
        return dim_cell("-");
    };
    match (column.column_type, &value) {
        (ColumnType::Status, _) => status_cell(record.status),
        (ColumnType::Currency, FieldValue::Number(amount)) => Cell::new(format!("{amount:.2}")),
        _ => Cell::new(value.to_string()),
    }
}

fn status_cell(status: ClaimStatus) -> Cell {
    let color = match status {
        ClaimStatus::Approved => Color::Green,
        ClaimStatus::Denied => Color::Red,
        ClaimStatus::PendingReview => Color::Yellow,
        ClaimStatus::InProgress => Color::Blue,
    };
    Cell::new(status.as_str()).fg(color)
}

pub fn stats_table(stats: &ClaimStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Claims"),
        header_cell("Amount"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let in_progress_amount =
        stats.total_amount - stats.approved_amount - stats.pending_amount - stats.denied_amount;
    let rows = [
        (ClaimStatus::Approved, stats.approved, stats.approved_amount),
        (ClaimStatus::PendingReview, stats.pending, stats.pending_amount),
        (ClaimStatus::Denied, stats.denied, stats.denied_amount),
        (ClaimStatus::InProgress, stats.in_progress, in_progress_amount),
    ];
    for (status, count, amount) in rows {
        table.add_row(vec![
            status_cell(status),
            count_cell(Some(count), Color::White),
            Cell::new(format!("{amount:.2}")),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.total).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}", stats.total_amount)).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn history_table(history: &[ImportHistoryEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Uploaded"),
        header_cell("File"),
        header_cell("Status"),
        header_cell("Processed"),
        header_cell("Failed"),
        header_cell("Total"),
        header_cell("Email"),
    ]);
    apply_table_style(&mut table);
    for index in 3..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in history {
        let status = match entry.upload_status {
            ImportStatus::Completed => Cell::new(entry.upload_status.as_str()).fg(Color::Green),
            ImportStatus::Failed => Cell::new(entry.upload_status.as_str()).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(entry.uploaded_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&entry.original_filename),
            status,
            Cell::new(entry.processed_records),
            count_cell(Some(entry.failed_records), Color::Red),
            Cell::new(entry.total_records),
            entry
                .email
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table
}

pub fn columns_table(registry: &SchemaRegistry, state: &TableViewState) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Key"),
        header_cell("Title"),
        header_cell("Type"),
        header_cell("Shown"),
    ]);
    apply_table_style(&mut table);
    let visible: Vec<_> = state
        .layout
        .visible_columns(registry)
        .iter()
        .map(|column| column.key)
        .collect();
    for group in registry.groups() {
        for column in &group.columns {
            let group_cell = if column.key == group.default_column {
                Cell::new(&group.id).add_attribute(Attribute::Bold)
            } else {
                dim_cell(&group.id)
            };
            let shown = if visible.contains(&column.key) {
                Cell::new("yes").fg(Color::Green)
            } else {
                dim_cell("no")
            };
            table.add_row(vec![
                group_cell,
                Cell::new(column.key.as_str()),
                Cell::new(&column.title),
                Cell::new(column.column_type.as_str()),
                shown,
            ]);
        }
    }
    table
}

pub fn fields_table(registry: &SchemaRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Options"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in registry.target_fields() {
        let required = if field.required {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            dim_cell("-")
        };
        let options = if field.options.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(field.options.join(", "))
        };
        table.add_row(vec![
            Cell::new(field.key.as_str()),
            Cell::new(&field.label),
            Cell::new(field.field_type.as_str()),
            required,
            options,
        ]);
    }
    table
}

/// First rows of an import file under its own headers.
pub fn preview_table(preview: &FilePreview) -> Table {
    let mut table = Table::new();
    table.set_header(
        preview
            .file_columns
            .iter()
            .map(|column| header_cell(column))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in &preview.preview_rows {
        table.add_row(
            row.iter()
                .map(|value| {
                    if value.is_empty() {
                        dim_cell("-")
                    } else {
                        Cell::new(value)
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// File column → claim field assignments, with the confidence of suggested ones.
pub fn mapping_table(
    headers: &[String],
    mapping: &ImportMapping,
    suggestions: &SuggestionResult,
    registry: &SchemaRegistry,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File Column"),
        header_cell("Claim Field"),
        header_cell("Confidence"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for header in headers {
        let target = mapping.target_for(header);
        let target_cell = match target.and_then(|key| registry.target_field(key)) {
            Some(field) if field.required => Cell::new(format!("{} *", field.label)),
            Some(field) => Cell::new(&field.label),
            None => dim_cell("(not imported)"),
        };
        let confidence = suggestions
            .suggestions
            .iter()
            .find(|s| &s.source_column == header && Some(s.target) == target)
            .map_or_else(
                || dim_cell("-"),
                |s| Cell::new(format!("{:.0}%", s.confidence * 100.0)),
            );
        table.add_row(vec![Cell::new(header), target_cell, confidence]);
    }
    table
}

pub fn print_mapping_summary(summary: &MappingSummary, registry: &SchemaRegistry) {
    println!(
        "Required fields mapped: {}/{}",
        summary.required_mapped, summary.required_total
    );
    if !summary.all_required_mapped() {
        let labels: Vec<&str> = summary
            .missing_required
            .iter()
            .filter_map(|key| registry.target_field(*key))
            .map(|field| field.label.as_str())
            .collect();
        eprintln!("warning: required fields not mapped: {}", labels.join(", "));
    }
}

pub fn failures_table(failures: &[RowFailure]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Problem"),
        header_cell("Details"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in failures {
        table.add_row(vec![
            Cell::new(failure.row),
            Cell::new(failure.issue.kind()).fg(Color::Red),
            Cell::new(failure.issue.to_string()),
        ]);
    }
    table
}

pub fn print_import_outcome(outcome: &ImportOutcome) {
    println!("{}", outcome.message());
    if !outcome.failures.is_empty() {
        println!();
        println!("Rejected rows:");
        println!("{}", failures_table(&outcome.failures));
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use claims_model::ImportCounts;
    use claims_standards::{claims_registry, load_seed_claims};
    use claims_table::{ColumnLayout, TableAction, compute_view};

    fn plain(mut table: Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    #[test]
    fn claims_page_marks_sort_and_pin() {
        let registry = claims_registry().unwrap();
        let records = load_seed_claims().unwrap();
        let state = TableViewState::new(ColumnLayout::default(), 5)
            .reduce(TableAction::TogglePin(claims_model::FieldKey::Id))
            .reduce(TableAction::ToggleSort(claims_model::FieldKey::Age));
        let view = compute_view(&records, &registry, &state);
        let text = plain(claims_table(&view, &state));
        assert!(text.contains("* Claim ID"));
        assert!(text.contains("Age ⬆"));
        assert_eq!(view.rows.len(), 5);
        for record in &view.rows {
            assert!(text.contains(&record.id));
        }
    }

    #[test]
    fn history_shows_counts_and_missing_email() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let counts = ImportCounts {
            processed: 2,
            failed: 1,
            total: 3,
        };
        let entry = ImportHistoryEntry::new("claims.csv", counts, at);
        let text = plain(history_table(&[entry]));
        assert!(text.contains("2024-03-01 09:30:00"));
        assert!(text.contains("claims.csv"));
        assert!(text.contains("completed"));
    }

    #[test]
    fn fields_list_required_markers() {
        let registry = claims_registry().unwrap();
        let text = plain(fields_table(&registry));
        for field in registry.target_fields() {
            assert!(text.contains(field.key.as_str()));
        }
        assert!(text.contains("Pending Review"));
    }
}
