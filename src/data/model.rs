use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before column typing
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell. The loader parses every input format
/// into rows of `CellValue` first; column typing (categorical text vs numeric
/// coercion) happens once, against the resolved header row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

impl CellValue {
    /// Build from raw text, trimming whitespace. Blank text is `Null`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    /// Consume the cell into display text, `None` when missing.
    pub fn into_text(self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the tracking-sheet schema
// ---------------------------------------------------------------------------

/// The seven columns a tracking sheet must provide. Variant order matches the
/// sheet's column order and is the iteration order wherever `Column` keys a
/// `BTreeMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    BusinessUnit,
    Champion,
    Status,
    Ryg,
    ExpectedValue,
    ActualValue,
}

impl Column {
    /// Every schema column, in sheet order.
    pub const ALL: [Column; 7] = [
        Column::Name,
        Column::BusinessUnit,
        Column::Champion,
        Column::Status,
        Column::Ryg,
        Column::ExpectedValue,
        Column::ActualValue,
    ];

    /// The categorical columns a filter selection may constrain.
    pub const CATEGORICAL: [Column; 5] = [
        Column::Name,
        Column::BusinessUnit,
        Column::Champion,
        Column::Status,
        Column::Ryg,
    ];

    /// Canonical header as it appears in the source sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "AI Use Case Name",
            Column::BusinessUnit => "Business Unit",
            Column::Champion => "Relevant champion stakeholder",
            Column::Status => "Current status",
            Column::Ryg => "Overall RYG status",
            Column::ExpectedValue => "Expected value",
            Column::ActualValue => "Actual value realized",
        }
    }

    /// Header match is trimmed and case-insensitive; the sheet revisions
    /// disagree on capitalisation and stray whitespace.
    pub fn matches(self, header: &str) -> bool {
        self.header().eq_ignore_ascii_case(header.trim())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

// ---------------------------------------------------------------------------
// UseCaseRecord – one row of the tracking sheet
// ---------------------------------------------------------------------------

/// A single tracked AI use case (one data row of the source sheet).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UseCaseRecord {
    pub name: Option<String>,
    pub business_unit: Option<String>,
    pub champion: Option<String>,
    /// Delivery stage, e.g. "Prioritization" or "Deployed".
    pub status: Option<String>,
    /// Traffic-light health indicator (Red / Yellow / Green).
    pub ryg: Option<String>,
    /// Projected value in currency units; `None` when missing or dirty.
    pub expected_value: Option<f64>,
    /// Value realized so far; `None` when missing or dirty.
    pub actual_value: Option<f64>,
}

impl UseCaseRecord {
    /// The record's value for a categorical column.
    ///
    /// # Panics
    /// Panics if called with a numeric column; filters only ever constrain
    /// the columns in [`Column::CATEGORICAL`].
    pub fn categorical(&self, column: Column) -> Option<&str> {
        match column {
            Column::Name => self.name.as_deref(),
            Column::BusinessUnit => self.business_unit.as_deref(),
            Column::Champion => self.champion.as_deref(),
            Column::Status => self.status.as_deref(),
            Column::Ryg => self.ryg.as_deref(),
            Column::ExpectedValue | Column::ActualValue => {
                panic!("{column} is numeric, not categorical")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// UseCaseDataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset with a pre-computed unique-value index. Built once
/// per load and treated as read-only thereafter; filtering selects rows, it
/// never rewrites them.
#[derive(Debug, Clone, PartialEq)]
pub struct UseCaseDataset {
    /// All records, in sheet order.
    pub records: Vec<UseCaseRecord>,
    /// For each categorical column, the sorted set of values present.
    /// Drives the multiselect widgets of the rendering layer; missing
    /// values are not listed.
    pub unique_values: BTreeMap<Column, BTreeSet<String>>,
}

impl UseCaseDataset {
    /// Build the unique-value index from loaded records.
    pub fn from_records(records: Vec<UseCaseRecord>) -> Self {
        let mut unique_values: BTreeMap<Column, BTreeSet<String>> = BTreeMap::new();

        for record in &records {
            for col in Column::CATEGORICAL {
                if let Some(value) = record.categorical(col) {
                    unique_values
                        .entry(col)
                        .or_default()
                        .insert(value.to_string());
                }
            }
        }
        UseCaseDataset {
            records,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
