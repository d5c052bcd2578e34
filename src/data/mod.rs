/// Data layer: core types, loading, caching, filtering and chart preparation.
///
/// Architecture:
/// ```text
///  bundled .csv / upload (.csv / .json / .parquet)
///        │
///        ▼
///   ┌──────────┐      ┌──────────────┐
///   │  loader   │ ◄──  │ DatasetCache │  source key → loaded table
///   └──────────┘      └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  rows x named columns, numeric / categorical
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  clean → year range → sample
///   └──────────┘
///        │
///        ├──────────────► chart   (histogram bins, scatter series)
///        └──────────────► export  (CSV bytes)
///
///  sample: builds the bundled sample file for the generator binary
/// ```

pub mod cache;
pub mod chart;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
