/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Arc<Row>>, column list
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  null / not-null predicates → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → .xlsx / .csv
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
