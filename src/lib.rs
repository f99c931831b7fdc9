//! rusty-sql: load a tabular file, inspect its column types and run ad-hoc
//! SQL against it.
//!
//! The flow is linear:
//!
//! 1. [`data::source`] picks the dataset (upload or repository file),
//! 2. [`data::loader::load`] decodes it into a [`Table`],
//! 3. [`query::QuerySession`] registers it as `data` and runs SQL,
//! 4. [`data::export`] writes results as CSV.
//!
//! [`session::AnalysisSession`] ties the steps together for one user.

pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod session;

pub use config::AppConfig;
pub use data::format::FileFormat;
pub use data::loader::load;
pub use data::model::{ColumnKind, ColumnSummary, Table};
pub use data::source::{resolve, DatasetSource, Repository, Upload};
pub use error::{Error, LoadError, QueryError, Result};
pub use query::QuerySession;
pub use session::AnalysisSession;
