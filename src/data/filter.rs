use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, UseCaseDataset, UseCaseRecord};

// ---------------------------------------------------------------------------
// FilterSelection – which values are allowed per categorical column
// ---------------------------------------------------------------------------

/// Per-column selection state: column → set of allowed values.
///
/// Semantics: a column that is absent, or whose set is empty, imposes no
/// constraint. An interactive sidebar therefore starts out unrestricted and
/// only narrows the view once the user picks values. Sheets that instead
/// pre-select every value (the "all ticked" style of sidebar) get the same
/// rows via [`FilterSelection::all_selected`].
///
/// A record whose value for an actively filtered column is missing never
/// matches that column's set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    columns: BTreeMap<Column, BTreeSet<String>>,
}

impl FilterSelection {
    /// No constraints; every record passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every categorical column with its full unique-value set, the
    /// "everything ticked" sidebar default. Behaves like [`new`](Self::new)
    /// until values are unticked.
    pub fn all_selected(dataset: &UseCaseDataset) -> Self {
        FilterSelection {
            columns: dataset
                .unique_values
                .iter()
                .map(|(col, vals)| (*col, vals.clone()))
                .collect(),
        }
    }

    /// Builder-style constraint, mostly for tests and embedding callers.
    pub fn with<I, S>(mut self, column: Column, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace a column's allowed set.
    pub fn set(&mut self, column: Column, values: BTreeSet<String>) {
        self.columns.insert(column, values);
    }

    /// Tick or untick a single value.
    pub fn toggle(&mut self, column: Column, value: &str) {
        let selected = self.columns.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Tick every value present in the dataset for this column.
    pub fn select_all(&mut self, column: Column, dataset: &UseCaseDataset) {
        let values = dataset
            .unique_values
            .get(&column)
            .cloned()
            .unwrap_or_default();
        self.columns.insert(column, values);
    }

    /// Drop the column's constraint entirely.
    pub fn clear(&mut self, column: Column) {
        self.columns.remove(&column);
    }

    /// The active constraint for a column, `None` when unrestricted.
    pub fn allowed(&self, column: Column) -> Option<&BTreeSet<String>> {
        self.columns.get(&column).filter(|set| !set.is_empty())
    }

    /// Whether no column carries an active constraint.
    pub fn is_unrestricted(&self) -> bool {
        Column::CATEGORICAL
            .iter()
            .all(|col| self.allowed(*col).is_none())
    }

    /// Whether a record passes every active constraint (AND across columns).
    pub fn matches(&self, record: &UseCaseRecord) -> bool {
        for (column, selected) in &self.columns {
            if selected.is_empty() {
                continue;
            }
            match record.categorical(*column) {
                Some(value) if selected.contains(value) => {}
                _ => return false,
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Filtering – a pure, order-preserving predicate over the records
// ---------------------------------------------------------------------------

/// Indices of records passing all active filters, in source order.
pub fn filtered_indices(records: &[UseCaseRecord], selection: &FilterSelection) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

/// The surviving records themselves, cloned in source order.
pub fn apply_filters(records: &[UseCaseRecord], selection: &FilterSelection) -> Vec<UseCaseRecord> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}
