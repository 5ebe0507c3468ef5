//! Table view state and the reducer that drives it.
//!
//! A [`TableViewState`] is a plain value. Every user action produces the next
//! state through [`TableViewState::reduce`]; the rows and columns to show are
//! then derived with [`compute_view`]. A single action is therefore applied
//! completely or not at all.

use std::collections::BTreeSet;

use claims_model::{ClaimRecord, FieldKey};
use claims_standards::{ColumnDef, SchemaRegistry};

use crate::columns::ColumnLayout;
use crate::filter::{FilterOrigin, FilterSet, FilterSpec};
use crate::page::{DEFAULT_PAGE_SIZE, PageInfo};
use crate::sort::{SortState, sort_records};

/// User actions on the claims table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    // Columns
    ToggleGroup(String),
    HideColumn(FieldKey),
    ShowColumn(FieldKey),
    TogglePin(FieldKey),

    // Filters
    /// Replace the quick filter of a column. An empty list clears it.
    SetQuickFilter {
        column: FieldKey,
        values: Vec<String>,
    },
    ClearQuickFilters,
    /// Replace the advanced filter of a column.
    SetFilter {
        column: FieldKey,
        spec: FilterSpec,
    },
    ClearFilter {
        column: FieldKey,
        origin: FilterOrigin,
    },
    ClearAllFilters,

    // Sort
    ToggleSort(FieldKey),
    ClearSort,

    // Paging
    SetPage(usize),
    SetPageSize(usize),

    // Selection
    ToggleRowSelection(String),
    /// Select every id of the current filtered set, or clear the selection
    /// when all of them are already selected.
    ToggleSelectAll { filtered_ids: Vec<String> },
}

impl TableAction {
    /// Actions after which the table returns to page 1.
    fn resets_page(&self) -> bool {
        matches!(
            self,
            TableAction::SetQuickFilter { .. }
                | TableAction::ClearQuickFilters
                | TableAction::SetFilter { .. }
                | TableAction::ClearFilter { .. }
                | TableAction::ClearAllFilters
                | TableAction::ToggleSort(_)
                | TableAction::ClearSort
                | TableAction::SetPageSize(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableViewState {
    pub layout: ColumnLayout,
    pub filters: FilterSet,
    pub sort: Option<SortState>,
    /// Requested 1-based page; clamped against the result when the view is computed.
    pub page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<String>,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            filters: FilterSet::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            selected: BTreeSet::new(),
        }
    }
}

impl TableViewState {
    pub fn new(layout: ColumnLayout, page_size: usize) -> Self {
        Self {
            layout,
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Apply one action and return the next state.
    #[must_use]
    pub fn reduce(mut self, action: TableAction) -> Self {
        let resets_page = action.resets_page();
        match action {
            TableAction::ToggleGroup(group_id) => self.layout.toggle_group(&group_id),
            TableAction::HideColumn(key) => self.layout.hide(key),
            TableAction::ShowColumn(key) => self.layout.show(key),
            TableAction::TogglePin(key) => self.layout.toggle_pin(key),

            TableAction::SetQuickFilter { column, values } => {
                self.filters.set_quick(column, values);
            }
            TableAction::ClearQuickFilters => self.filters.clear_origin(FilterOrigin::Quick),
            TableAction::SetFilter { column, spec } => {
                self.filters.set(FilterOrigin::Advanced, column, spec);
            }
            TableAction::ClearFilter { column, origin } => {
                self.filters.clear(origin, column);
            }
            TableAction::ClearAllFilters => self.filters.clear_all(),

            TableAction::ToggleSort(key) => self.sort = Some(SortState::toggle(self.sort, key)),
            TableAction::ClearSort => self.sort = None,

            TableAction::SetPage(page) => self.page = page.max(1),
            TableAction::SetPageSize(size) => self.page_size = size.max(1),

            TableAction::ToggleRowSelection(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
            }
            TableAction::ToggleSelectAll { filtered_ids } => {
                let all_selected = !filtered_ids.is_empty()
                    && filtered_ids.iter().all(|id| self.selected.contains(id));
                self.selected = if all_selected {
                    BTreeSet::new()
                } else {
                    filtered_ids.into_iter().collect()
                };
            }
        }
        if resets_page {
            self.page = 1;
        }
        self
    }

    /// Records passing the filters, in sort order.
    pub fn filtered_sorted<'a>(&self, records: &'a [ClaimRecord]) -> Vec<&'a ClaimRecord> {
        let mut rows = crate::filter::apply_filters(records, &self.filters);
        sort_records(&mut rows, self.sort);
        rows
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }
}

/// Everything needed to render one page of the table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub columns: Vec<&'a ColumnDef>,
    pub rows: Vec<&'a ClaimRecord>,
    pub page: PageInfo,
    /// Size of the filtered set (all pages).
    pub filtered_count: usize,
    /// Size of the record set before filtering.
    pub total_count: usize,
}

/// Derive the visible page and columns from a state snapshot.
pub fn compute_view<'a>(
    records: &'a [ClaimRecord],
    registry: &'a SchemaRegistry,
    state: &TableViewState,
) -> TableView<'a> {
    let filtered = state.filtered_sorted(records);
    let page = PageInfo::new(filtered.len(), state.page, state.page_size);
    let rows = filtered[page.start..page.end].to_vec();
    TableView {
        columns: state.layout.visible_columns(registry),
        rows,
        page,
        filtered_count: filtered.len(),
        total_count: records.len(),
    }
}
