//! SQL query engine module.
//!
//! Wraps an embedded DataFusion [`SessionContext`] holding exactly one
//! relation, `data`, bound to the loaded table. Every [`QuerySession`] owns
//! its own context and a current-thread tokio runtime that drives
//! DataFusion's async API to completion, so callers see plain blocking calls.
//!
//! Statements are passed through untouched. There is no parameter binding,
//! no statement splitting and no restriction on statement kind: DDL and DML
//! run against the in-memory catalog like any query would.

use std::sync::Arc;

use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use log::{debug, info, warn};
use tokio::runtime::Runtime;

use crate::data::model::Table;
use crate::error::QueryError;

/// Name under which the loaded table is registered.
pub const TABLE_NAME: &str = "data";

/// Single partition keeps result row order deterministic.
fn create_session_context() -> SessionContext {
    let config = SessionConfig::new()
        .with_target_partitions(1)
        .with_information_schema(false);
    SessionContext::new_with_config(config)
}

/// An ephemeral query catalog for one loaded table.
pub struct QuerySession {
    ctx: SessionContext,
    runtime: Runtime,
}

impl QuerySession {
    /// Create a fresh engine and register `table` as `data`.
    pub fn prepare(table: &Table) -> Result<Self, QueryError> {
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        let session = Self {
            ctx: create_session_context(),
            runtime,
        };
        session.register(table)?;
        Ok(session)
    }

    /// Bind `table` to `data`, fully replacing whatever was there before.
    pub fn register(&self, table: &Table) -> Result<(), QueryError> {
        if self.ctx.deregister_table(TABLE_NAME)?.is_some() {
            debug!("Replaced previous '{TABLE_NAME}' relation");
        }

        let provider = MemTable::try_new(table.schema(), vec![vec![table.batch().clone()]])?;
        self.ctx.register_table(TABLE_NAME, Arc::new(provider))?;

        info!(
            "Registered '{TABLE_NAME}' with {} rows and {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(())
    }

    /// Execute one SQL statement and materialize the whole result.
    ///
    /// Nothing is cached; running the same text twice executes it twice.
    pub fn run(&self, sql: &str) -> Result<Table, QueryError> {
        debug!("Executing SQL: {sql}");

        let result = self.runtime.block_on(async {
            let df = self.ctx.sql(sql).await?;
            let schema = df.schema().inner().clone();
            let batches = df.collect().await?;
            Ok::<_, QueryError>((schema, batches))
        });

        let (schema, batches) = match result {
            Ok(output) => output,
            Err(e) => {
                warn!("Query failed: {e}");
                return Err(e);
            }
        };

        // Batches carry the physical schema, which may differ from the
        // logical one in nullability.
        let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
        let table = Table::from_batches(schema, &batches)?;

        info!(
            "Query returned {} rows and {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }
}
