//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseSchema};
use crate::value::{Row, SqlValue};
use async_trait::async_trait;
use duckdb::types::{ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Schema used for unqualified names
const DEFAULT_SCHEMA: &str = "main";

/// DuckDB database backend
///
/// A single connection behind a mutex: migrations are sequential, and
/// transactions must stay on one session.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(b) => Value::Boolean(*b),
            SqlValue::Int(i) => Value::BigInt(*i),
            SqlValue::Double(d) => Value::Double(*d),
            SqlValue::Text(s) => Value::Text(s.clone()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Map a DuckDB value onto the backend-neutral representation.
fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(i) => SqlValue::Int(i64::from(i)),
        Value::SmallInt(i) => SqlValue::Int(i64::from(i)),
        Value::Int(i) => SqlValue::Int(i64::from(i)),
        Value::BigInt(i) => SqlValue::Int(i),
        Value::UTinyInt(u) => SqlValue::Int(i64::from(u)),
        Value::USmallInt(u) => SqlValue::Int(i64::from(u)),
        Value::UInt(u) => SqlValue::Int(i64::from(u)),
        Value::UBigInt(u) => {
            i64::try_from(u).map_or_else(|_| SqlValue::Text(u.to_string()), SqlValue::Int)
        }
        Value::HugeInt(i) => {
            i64::try_from(i).map_or_else(|_| SqlValue::Text(i.to_string()), SqlValue::Int)
        }
        Value::Float(f) => SqlValue::Double(f64::from(f)),
        Value::Double(d) => SqlValue::Double(d),
        Value::Text(s) => SqlValue::Text(s),
        other => SqlValue::Text(format!("{other:?}")),
    }
}

/// Split `schema.name` into its parts, defaulting the schema.
fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => (DEFAULT_SCHEMA, name),
    }
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(|e| DbError::execution(e, sql))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::execution(e, sql))
    }

    /// Query rows synchronously
    ///
    /// Column metadata is read from each row rather than the statement: DuckDB
    /// panics on `Statement::column_count()` before execution.
    fn query_rows_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(|e| DbError::execution(e, sql))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let column_count = row.as_ref().column_count();
                (0..column_count)
                    .map(|i| row.get::<_, Value>(i).map(to_sql_value))
                    .collect::<duckdb::Result<Vec<_>>>()
                    .map(Row::new)
            })
            .map_err(|e| DbError::execution(e, sql))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::execution(e, sql))?;
        Ok(rows)
    }

    /// Query a single COUNT(*) synchronously
    fn query_count_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<i64> {
        let conn = self.lock()?;
        conn.query_row(sql, params_from_iter(params.iter()), |row| row.get::<_, i64>(0))
            .map_err(|e| DbError::execution(e, sql))
    }

    fn transaction_sync(&self, action: &str, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::TransactionError {
                action: action.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql, &[])
    }

    async fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.execute_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.query_rows_sync(sql, params)
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN", "BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT", "COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK", "ROLLBACK")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseSchema for DuckDbBackend {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self.query_count_sync(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?)",
            &[schema.into(), table.into()],
        )?;
        Ok(count > 0)
    }

    async fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self.query_count_sync(
            "SELECT COUNT(*) FROM information_schema.columns \
             WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?) \
             AND lower(column_name) = lower(?)",
            &[schema.into(), table.into(), column.into()],
        )?;
        Ok(count > 0)
    }

    async fn index_exists(&self, table: &str, index: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self.query_count_sync(
            "SELECT COUNT(*) FROM duckdb_indexes() \
             WHERE lower(schema_name) = lower(?) AND lower(table_name) = lower(?) \
             AND lower(index_name) = lower(?)",
            &[schema.into(), table.into(), index.into()],
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
