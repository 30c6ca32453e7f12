//! casetrack – the data core of an AI use-case tracking dashboard.
//!
//! Loads a spreadsheet of tracked use cases, filters it by per-column
//! selections, and aggregates the surviving rows into the KPIs and count
//! tables a rendering layer turns into metric cards, charts, and a table.
//! One interaction, one synchronous pass: load (from cache) → filter →
//! aggregate → hand over a [`RenderModel`].

pub mod aggregate;
pub mod dashboard;
pub mod data;

pub use aggregate::{GroupCount, Kpis, ValueCount, compute_kpis, group_count, value_counts};
pub use dashboard::{Dashboard, RenderModel};
pub use data::cache::DatasetCache;
pub use data::filter::{FilterSelection, apply_filters, filtered_indices};
pub use data::loader::{LoadError, LoadOptions, coerce_number, load_file};
pub use data::model::{CellValue, Column, UseCaseDataset, UseCaseRecord};
