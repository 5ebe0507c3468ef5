//! Table view flags and their translation into a [`TableViewState`].
//!
//! Each flag becomes one [`TableAction`]; the state is the fold of those
//! actions over the configured starting layout.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use clap::Args;

use claims_model::{ClaimStatus, FieldKey, format_numeric};
use claims_standards::SchemaRegistry;
use claims_table::{ColumnLayout, FilterSpec, TableAction, TableViewState, parse_date};

use crate::config::AppConfig;

#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Only claims with this status (repeatable).
    #[arg(long = "status", value_name = "STATUS")]
    pub status: Vec<String>,

    /// Quick filter on an exact value (repeatable; values of one column are alternatives).
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filter: Vec<String>,

    /// Keep rows whose column contains TEXT, ignoring case.
    #[arg(long = "contains", value_name = "COLUMN=TEXT")]
    pub contains: Vec<String>,

    /// Inclusive numeric range; either bound may be omitted (`age=..40`).
    #[arg(long = "range", value_name = "COLUMN=MIN..MAX")]
    pub range: Vec<String>,

    /// Inclusive date range; either bound may be omitted.
    #[arg(long = "date-range", value_name = "COLUMN=FROM..TO")]
    pub date_range: Vec<String>,

    /// Sort by this column (ascending unless --desc).
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    #[arg(long = "desc", requires = "sort")]
    pub desc: bool,

    /// 1-based page number; clamped to the last page.
    #[arg(long = "page", value_name = "N")]
    pub page: Option<usize>,

    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Expand a column group (repeatable).
    #[arg(long = "expand", value_name = "GROUP")]
    pub expand: Vec<String>,

    /// Collapse a column group (repeatable).
    #[arg(long = "collapse", value_name = "GROUP")]
    pub collapse: Vec<String>,

    /// Start with every column group expanded.
    #[arg(long = "all-columns")]
    pub all_columns: bool,

    /// Hide a column of an expanded group (repeatable).
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hide: Vec<String>,

    /// Pin a column to the left (repeatable).
    #[arg(long = "pin", value_name = "COLUMN")]
    pub pin: Vec<String>,
}

/// Resolve a column by key, column title or target label, ignoring case.
pub fn resolve_column(registry: &SchemaRegistry, name: &str) -> Result<FieldKey> {
    if let Ok(key) = FieldKey::from_str(name) {
        return Ok(key);
    }
    let wanted = name.trim().to_lowercase();
    registry
        .columns()
        .find(|column| column.title.to_lowercase() == wanted)
        .map(|column| column.key)
        .or_else(|| registry.resolve_field_name(name))
        .ok_or_else(|| anyhow!("unknown column: {name}"))
}

fn split_assignment<'a>(raw: &'a str, expected: &str) -> Result<(&'a str, &'a str)> {
    raw.split_once('=')
        .map(|(column, value)| (column.trim(), value.trim()))
        .filter(|(column, _)| !column.is_empty())
        .ok_or_else(|| anyhow!("invalid argument '{raw}' (expected {expected})"))
}

fn split_bounds<'a>(raw: &'a str) -> Result<(Option<&'a str>, Option<&'a str>)> {
    let (low, high) = raw
        .split_once("..")
        .ok_or_else(|| anyhow!("invalid range '{raw}' (expected FROM..TO)"))?;
    let bound = |value: &'a str| -> Option<&'a str> {
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    };
    let (low, high) = (bound(low), bound(high));
    if low.is_none() && high.is_none() {
        bail!("range '{raw}' has no bounds");
    }
    Ok((low, high))
}

/// Parse `MIN..MAX` into a numeric range filter.
pub fn parse_number_range(raw: &str) -> Result<FilterSpec> {
    let (low, high) = split_bounds(raw)?;
    let number = |text: Option<&str>| -> Result<Option<f64>> {
        text.map(|text| {
            text.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| anyhow!("'{text}' is not a number"))
        })
        .transpose()
    };
    let (min, max) = (number(low)?, number(high)?);
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        bail!("range '{raw}' is empty");
    }
    Ok(FilterSpec::NumberRange { min, max })
}

/// Parse `FROM..TO` into a date range filter.
pub fn parse_date_range(raw: &str) -> Result<FilterSpec> {
    let (low, high) = split_bounds(raw)?;
    let date = |text: Option<&str>| {
        text.map(|text| parse_date(text).ok_or_else(|| anyhow!("'{text}' is not a date")))
            .transpose()
    };
    let (from, to) = (date(low)?, date(high)?);
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        bail!("date range '{raw}' is empty");
    }
    Ok(FilterSpec::DateRange { from, to })
}

#[derive(Clone, Copy)]
enum AdvancedKind {
    Text,
    Number,
    Date,
}

impl AdvancedKind {
    fn expected(self) -> &'static str {
        match self {
            AdvancedKind::Text => "COLUMN=TEXT",
            AdvancedKind::Number => "COLUMN=MIN..MAX",
            AdvancedKind::Date => "COLUMN=FROM..TO",
        }
    }

    fn parse(self, value: &str) -> Result<FilterSpec> {
        match self {
            AdvancedKind::Text => Ok(FilterSpec::text(value)),
            AdvancedKind::Number => parse_number_range(value),
            AdvancedKind::Date => parse_date_range(value),
        }
    }
}

/// Quick filter value in the form the table displays it.
fn quick_value(column: FieldKey, raw: &str) -> Result<String> {
    if column == FieldKey::Status {
        let status = ClaimStatus::from_str(raw)?;
        return Ok(status.as_str().to_string());
    }
    if column.is_numeric()
        && let Some(number) = raw.parse::<f64>().ok().filter(|value| value.is_finite())
    {
        return Ok(format_numeric(number));
    }
    Ok(raw.to_string())
}

fn check_group(registry: &SchemaRegistry, group: &str) -> Result<()> {
    if registry.group(group).is_none() {
        let known: Vec<&str> = registry.groups().iter().map(|g| g.id.as_str()).collect();
        bail!("unknown column group '{group}' (known: {})", known.join(", "));
    }
    Ok(())
}

impl ViewArgs {
    /// Starting layout from config and the group flags.
    fn layout(&self, config: &AppConfig, registry: &SchemaRegistry) -> Result<ColumnLayout> {
        let mut expanded: BTreeSet<String> = if self.all_columns {
            registry.groups().iter().map(|g| g.id.clone()).collect()
        } else {
            for group in &config.expanded_groups {
                check_group(registry, group)?;
            }
            config.expanded_groups.iter().cloned().collect()
        };
        for group in &self.expand {
            check_group(registry, group)?;
            expanded.insert(group.clone());
        }
        for group in &self.collapse {
            check_group(registry, group)?;
            expanded.remove(group);
        }
        Ok(ColumnLayout::with_expanded(expanded))
    }

    /// Table actions for the filter, sort, column and page flags, in the
    /// order they are applied.
    pub fn actions(&self, registry: &SchemaRegistry) -> Result<Vec<TableAction>> {
        let mut actions = Vec::new();

        let hidden: BTreeSet<FieldKey> = self
            .hide
            .iter()
            .map(|name| resolve_column(registry, name))
            .collect::<Result<_>>()?;
        actions.extend(hidden.into_iter().map(TableAction::HideColumn));
        let pinned: BTreeSet<FieldKey> = self
            .pin
            .iter()
            .map(|name| resolve_column(registry, name))
            .collect::<Result<_>>()?;
        actions.extend(pinned.into_iter().map(TableAction::TogglePin));

        let mut quick: BTreeMap<FieldKey, Vec<String>> = BTreeMap::new();
        for status in &self.status {
            quick
                .entry(FieldKey::Status)
                .or_default()
                .push(quick_value(FieldKey::Status, status)?);
        }
        for raw in &self.filter {
            let (name, value) = split_assignment(raw, "COLUMN=VALUE")?;
            let column = resolve_column(registry, name)?;
            quick
                .entry(column)
                .or_default()
                .push(quick_value(column, value)?);
        }
        actions.extend(
            quick
                .into_iter()
                .map(|(column, values)| TableAction::SetQuickFilter { column, values }),
        );

        let mut advanced: BTreeMap<FieldKey, FilterSpec> = BTreeMap::new();
        let parsed = self
            .contains
            .iter()
            .map(|raw| (raw, AdvancedKind::Text))
            .chain(self.range.iter().map(|raw| (raw, AdvancedKind::Number)))
            .chain(self.date_range.iter().map(|raw| (raw, AdvancedKind::Date)));
        for (raw, kind) in parsed {
            let (name, value) = split_assignment(raw, kind.expected())?;
            let column = resolve_column(registry, name)?;
            let spec = kind.parse(value)?;
            if advanced.insert(column, spec).is_some() {
                bail!("more than one advanced filter on column {column}");
            }
        }
        actions.extend(
            advanced
                .into_iter()
                .map(|(column, spec)| TableAction::SetFilter { column, spec }),
        );

        if let Some(name) = &self.sort {
            let key = resolve_column(registry, name)?;
            actions.push(TableAction::ToggleSort(key));
            if self.desc {
                actions.push(TableAction::ToggleSort(key));
            }
        }

        if let Some(page) = self.page {
            actions.push(TableAction::SetPage(page));
        }
        Ok(actions)
    }

    /// Build the view state these flags describe.
    pub fn to_state(
        &self,
        config: &AppConfig,
        registry: &SchemaRegistry,
    ) -> Result<TableViewState> {
        let page_size = self.page_size.unwrap_or(config.page_size);
        if page_size == 0 {
            bail!("page size must be at least 1");
        }
        let initial = TableViewState::new(self.layout(config, registry)?, page_size);
        Ok(self
            .actions(registry)?
            .into_iter()
            .fold(initial, TableViewState::reduce))
    }
}
