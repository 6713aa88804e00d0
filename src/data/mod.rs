/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MovieDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MovieDataset  │  Vec<Movie>, industry domain, year bounds
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year window + industry set → filtered view
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs, trend, genre counts, distributions
///   └───────────┘     (genre explode, stats, currency format)
/// ```

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod genre;
pub mod loader;
pub mod model;
pub mod stats;
