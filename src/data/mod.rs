/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordSet (+ skipped rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<LoadedDataset>, reloaded only on request
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year ∧ segment ∧ industry → filtered RecordSet
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  sums per key, KPIs, top keys
///   └───────────┘
/// ```
pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
