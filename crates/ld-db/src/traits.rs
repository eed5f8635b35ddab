//! Database trait definitions
//!
//! The migration engine talks to a live database through two capabilities:
//! [`DatabaseCore`] executes statements and [`DatabaseSchema`] answers
//! catalogue questions so steps can detect that they already ran.
//! Anything implementing both is a [`Database`].

use crate::error::DbResult;
use crate::value::{Row, SqlValue};
use async_trait::async_trait;

/// Statement execution
///
/// Implementations must be Send + Sync for async operation. Parameters use
/// `?` placeholders regardless of backend.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a single parameterised statement, returns affected rows
    async fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute multiple `;`-separated statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a parameterised query and collect every row
    async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Start a transaction on the underlying session
    async fn begin(&self) -> DbResult<()>;

    /// Commit the current transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the current transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Dialect id of the connected vendor (`postgresql`, `duckdb`, ...)
    fn db_type(&self) -> &'static str;
}

/// Catalogue introspection; all name comparisons are case-insensitive
#[async_trait]
pub trait DatabaseSchema: Send + Sync {
    /// Check if a table exists
    async fn table_exists(&self, table: &str) -> DbResult<bool>;

    /// Check if a column exists on a table
    async fn column_exists(&self, table: &str, column: &str) -> DbResult<bool>;

    /// Check if an index with this name exists on a table
    async fn index_exists(&self, table: &str, index: &str) -> DbResult<bool>;
}

/// Full database capability used by the migration engine
pub trait Database: DatabaseCore + DatabaseSchema {}

impl<T: DatabaseCore + DatabaseSchema> Database for T {}
