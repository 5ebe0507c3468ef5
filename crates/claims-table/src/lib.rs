//! Claims table engine.
//!
//! Pure functions over a record snapshot: filter, sort, paginate, choose the
//! visible columns and export what is on screen. State changes go through
//! [`TableViewState::reduce`].

mod columns;
mod error;
mod export;
mod filter;
mod page;
mod sort;
mod state;
mod stats;

pub use columns::{ColumnLayout, ColumnPrefs};
pub use error::{Result, TableError};
pub use export::{ExportFormat, export_delimited};
pub use filter::{
    FilterOrigin, FilterSet, FilterSpec, ValueSet, apply_filters, distinct_values, parse_date,
};
pub use page::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PageInfo, paginate};
pub use sort::{SortDirection, SortState, sort_records};
pub use state::{TableAction, TableView, TableViewState, compute_view};
pub use stats::ClaimStats;
