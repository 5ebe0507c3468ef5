//! Column visibility: group expansion plus per-column preferences.

use std::collections::{BTreeMap, BTreeSet};

use claims_model::FieldKey;
use claims_standards::{ColumnDef, ColumnGroup, DEFAULT_EXPANDED_GROUPS, SchemaRegistry};

/// Display preferences of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPrefs {
    pub visible: bool,
    pub pinned: bool,
}

impl Default for ColumnPrefs {
    fn default() -> Self {
        Self {
            visible: true,
            pinned: false,
        }
    }
}

/// Expanded groups and column preferences.
///
/// Columns without an entry use [`ColumnPrefs::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    expanded: BTreeSet<String>,
    prefs: BTreeMap<FieldKey, ColumnPrefs>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::with_expanded(DEFAULT_EXPANDED_GROUPS.iter().copied())
    }
}

impl ColumnLayout {
    pub fn with_expanded<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: groups.into_iter().map(Into::into).collect(),
            prefs: BTreeMap::new(),
        }
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded.contains(group_id)
    }

    pub fn expanded_groups(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn toggle_group(&mut self, group_id: &str) {
        if !self.expanded.remove(group_id) {
            self.expanded.insert(group_id.to_string());
        }
    }

    pub fn prefs(&self, key: FieldKey) -> ColumnPrefs {
        self.prefs.get(&key).copied().unwrap_or_default()
    }

    fn update(&mut self, key: FieldKey, f: impl FnOnce(&mut ColumnPrefs)) {
        let mut prefs = self.prefs(key);
        f(&mut prefs);
        if prefs == ColumnPrefs::default() {
            self.prefs.remove(&key);
        } else {
            self.prefs.insert(key, prefs);
        }
    }

    pub fn hide(&mut self, key: FieldKey) {
        self.update(key, |prefs| prefs.visible = false);
    }

    pub fn show(&mut self, key: FieldKey) {
        self.update(key, |prefs| prefs.visible = true);
    }

    pub fn toggle_pin(&mut self, key: FieldKey) {
        self.update(key, |prefs| prefs.pinned = !prefs.pinned);
    }

    pub fn hidden_columns(&self) -> Vec<FieldKey> {
        self.prefs
            .iter()
            .filter(|(_, prefs)| !prefs.visible)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn pinned_columns(&self) -> Vec<FieldKey> {
        self.prefs
            .iter()
            .filter(|(_, prefs)| prefs.pinned)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Visible columns of one group: all columns when expanded, otherwise
    /// only the default column; hidden columns dropped.
    ///
    /// May be empty when the default column of a collapsed group is hidden.
    pub fn group_visible_columns<'r>(&self, group: &'r ColumnGroup) -> Vec<&'r ColumnDef> {
        let expanded = self.is_expanded(&group.id);
        group
            .columns
            .iter()
            .filter(|column| expanded || column.key == group.default_column)
            .filter(|column| self.prefs(column.key).visible)
            .collect()
    }

    /// Columns to display, in registry order with pinned columns moved to
    /// the front. Relative order inside the pinned and unpinned parts is kept.
    pub fn visible_columns<'r>(&self, registry: &'r SchemaRegistry) -> Vec<&'r ColumnDef> {
        let mut columns: Vec<&ColumnDef> = registry
            .groups()
            .iter()
            .flat_map(|group| self.group_visible_columns(group))
            .collect();
        // `sort_by_key` is stable.
        columns.sort_by_key(|column| !self.prefs(column.key).pinned);
        columns
    }
}
