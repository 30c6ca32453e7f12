use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{self, LoadError, LoadOptions};
use super::model::UseCaseDataset;

// ---------------------------------------------------------------------------
// DatasetCache – load once per path, reuse for the process lifetime
// ---------------------------------------------------------------------------

/// Memoizes loaded datasets by path so every sidebar interaction after the
/// first does not re-read the file. Owned by whoever composes the loader
/// with a rendering layer, which keeps it resettable in tests instead of
/// living as ambient global state.
///
/// There is no invalidation beyond the explicit [`invalidate`] /
/// [`clear`] calls: no file watching, no TTL.
///
/// [`invalidate`]: DatasetCache::invalidate
/// [`clear`]: DatasetCache::clear
#[derive(Debug, Default)]
pub struct DatasetCache {
    options: LoadOptions,
    entries: BTreeMap<PathBuf, Arc<UseCaseDataset>>,
}

impl DatasetCache {
    /// A cache whose loads use the given options.
    pub fn new(options: LoadOptions) -> Self {
        DatasetCache {
            options,
            entries: BTreeMap::new(),
        }
    }

    /// Return the cached dataset for `path`, loading it on first use.
    /// A failed load caches nothing, so the next call retries the file.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<UseCaseDataset>, LoadError> {
        if let Some(dataset) = self.entries.get(path) {
            log::debug!("cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(loader::load_file(path, &self.options)?);
        log::info!(
            "loaded {} use cases from {}",
            dataset.len(),
            path.display()
        );
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop a single cached entry. Returns the evicted dataset, if any.
    pub fn invalidate(&mut self, path: &Path) -> Option<Arc<UseCaseDataset>> {
        self.entries.remove(path)
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
