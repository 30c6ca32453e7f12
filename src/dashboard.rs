//! Dashboard engine: composes the dataset cache with filtering and
//! aggregation, one synchronous recompute per user interaction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::{GroupCount, Kpis, ValueCount, compute_kpis, group_count, value_counts};
use crate::data::cache::DatasetCache;
use crate::data::filter::{FilterSelection, filtered_indices};
use crate::data::loader::{LoadError, LoadOptions};
use crate::data::model::{Column, UseCaseDataset, UseCaseRecord};

// ---------------------------------------------------------------------------
// RenderModel – everything the rendering layer needs for one frame
// ---------------------------------------------------------------------------

/// The aggregated view handed to the rendering collaborator after each
/// filter change: metric-card scalars, the chart count tables, and the rows
/// for the data table. Plain data, serializable, no rendering assumptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderModel {
    pub kpis: Kpis,
    /// Rows per delivery stage (`Current status`), for the bar chart.
    pub stage_counts: Vec<ValueCount>,
    /// Rows per `Overall RYG status`, for the pie chart.
    pub ryg_counts: Vec<ValueCount>,
    /// Rows per (stage, RYG) pair, for the stacked bar chart.
    pub stage_ryg: Vec<GroupCount>,
    /// The filtered records, in source order, for the data table.
    pub rows: Vec<UseCaseRecord>,
}

impl RenderModel {
    /// Aggregate a filtered row set.
    pub fn from_rows(rows: Vec<UseCaseRecord>) -> Self {
        RenderModel {
            kpis: compute_kpis(&rows),
            stage_counts: value_counts(&rows, Column::Status),
            ryg_counts: value_counts(&rows, Column::Ryg),
            stage_ryg: group_count(&rows, Column::Status, Column::Ryg),
            rows,
        }
    }

    /// `false` when the current filters leave nothing to chart; the
    /// rendering layer shows a "no data" notice instead of empty charts.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dashboard – cache + current selection
// ---------------------------------------------------------------------------

/// The data side of one dashboard: a source file, the cache that memoizes
/// it, and the user's current filter selection.
pub struct Dashboard {
    cache: DatasetCache,
    source: PathBuf,
    dataset: Option<Arc<UseCaseDataset>>,
    selection: FilterSelection,
}

impl Dashboard {
    /// A dashboard over `source` with default load options.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self::with_options(source, LoadOptions::default())
    }

    /// A dashboard over `source`; `options` covers sheets with title rows.
    pub fn with_options(source: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Dashboard {
            cache: DatasetCache::new(options),
            source: source.into(),
            dataset: None,
            selection: FilterSelection::new(),
        }
    }

    /// Load (or fetch from cache) the source file and reset the filters.
    /// On failure the previous dataset and selection stay in place.
    pub fn load(&mut self) -> Result<(), LoadError> {
        match self.cache.get_or_load(&self.source) {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.selection = FilterSelection::new();
                Ok(())
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", self.source.display());
                Err(e)
            }
        }
    }

    /// Drop the cached dataset so the next [`load`](Self::load) re-reads
    /// the file.
    pub fn refresh(&mut self) -> Result<(), LoadError> {
        self.cache.invalidate(&self.source);
        self.load()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The loaded dataset, `None` before the first successful load.
    pub fn dataset(&self) -> Option<&UseCaseDataset> {
        self.dataset.as_deref()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Store the new selection and recompute the render model — the one
    /// entry point a UI event loop calls per interaction.
    pub fn on_filter_changed(&mut self, selection: FilterSelection) -> RenderModel {
        self.selection = selection;
        self.render_model()
    }

    /// Recompute the render model from the current selection.
    pub fn render_model(&self) -> RenderModel {
        let Some(dataset) = &self.dataset else {
            return RenderModel::default();
        };

        let indices = filtered_indices(&dataset.records, &self.selection);
        let rows: Vec<UseCaseRecord> = indices
            .iter()
            .map(|&i| dataset.records[i].clone())
            .collect();
        log::debug!(
            "recomputed render model: {} of {} rows visible",
            rows.len(),
            dataset.len()
        );
        RenderModel::from_rows(rows)
    }
}
