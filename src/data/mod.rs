/// Data layer: sources, loading, the table model and CSV export.
///
/// Architecture:
/// ```text
///  upload  /  ./data/<file>
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  resolve upload vs. repository selection
///   └──────────┘
///        │  reader + file name
///        ▼
///   ┌──────────┐
///   │  loader   │  dispatch on extension → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  one Arrow record batch, unique column names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  CSV with header, no index
///   └──────────┘
/// ```

pub mod export;
pub mod format;
pub mod loader;
pub mod model;
pub mod source;
