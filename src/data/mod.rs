/// Data layer: core types, loading, filtering, and the dataset cache.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → UseCaseDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetCache  │  memoize by path for the process lifetime
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ UseCaseDataset│  Vec<UseCaseRecord>, unique-value index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply per-column selections → filtered indices
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
