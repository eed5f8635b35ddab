//! Database doubles: a scripted fake for dialects without an embedded
//! backend, and an instrumented DuckDB wrapper

use async_trait::async_trait;
use ld_db::{DatabaseCore, DatabaseSchema, DbError, DbResult, DuckDbBackend, Row, SqlValue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every statement and answers queries from canned rows.
///
/// Canned rows are matched by substring of the SQL text; the first match wins.
/// Existence checks answer from the configured sets (lowercased).
pub(crate) struct FakeDatabase {
    db_type: &'static str,
    executed: Mutex<Vec<(String, Vec<SqlValue>)>>,
    canned: Vec<(String, Vec<Row>)>,
    tables: HashSet<String>,
    columns: HashSet<(String, String)>,
    indexes: HashSet<(String, String)>,
    fail_on: Option<String>,
}

impl FakeDatabase {
    pub(crate) fn new(db_type: &'static str) -> Self {
        Self {
            db_type,
            executed: Mutex::new(Vec::new()),
            canned: Vec::new(),
            tables: HashSet::new(),
            columns: HashSet::new(),
            indexes: HashSet::new(),
            fail_on: None,
        }
    }

    pub(crate) fn with_rows(mut self, sql_fragment: &str, rows: Vec<Vec<SqlValue>>) -> Self {
        self.canned.push((
            sql_fragment.to_string(),
            rows.into_iter().map(Row::new).collect(),
        ));
        self
    }

    pub(crate) fn with_table(mut self, table: &str) -> Self {
        self.tables.insert(table.to_lowercase());
        self
    }

    pub(crate) fn with_column(mut self, table: &str, column: &str) -> Self {
        self.columns
            .insert((table.to_lowercase(), column.to_lowercase()));
        self
    }

    pub(crate) fn with_index(mut self, table: &str, index: &str) -> Self {
        self.indexes
            .insert((table.to_lowercase(), index.to_lowercase()));
        self
    }

    /// Fail any statement containing `sql_fragment`.
    pub(crate) fn failing_on(mut self, sql_fragment: &str) -> Self {
        self.fail_on = Some(sql_fragment.to_string());
        self
    }

    /// Statements passed to the execute methods, in order
    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub(crate) fn executed_with_params(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.executed.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, params: &[SqlValue]) -> DbResult<()> {
        if let Some(fragment) = &self.fail_on {
            if sql.contains(fragment.as_str()) {
                return Err(DbError::execution("scripted failure", sql));
            }
        }
        self.executed
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(())
    }
}

#[async_trait]
impl DatabaseCore for FakeDatabase {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.record(sql, &[])?;
        Ok(1)
    }

    async fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.record(sql, params)?;
        Ok(1)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.record(sql, &[])
    }

    async fn query_rows(&self, sql: &str, _params: &[SqlValue]) -> DbResult<Vec<Row>> {
        Ok(self
            .canned
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn begin(&self) -> DbResult<()> {
        Ok(())
    }

    async fn commit(&self) -> DbResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        self.db_type
    }
}

#[async_trait]
impl DatabaseSchema for FakeDatabase {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        Ok(self.tables.contains(&table.to_lowercase()))
    }

    async fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        Ok(self
            .columns
            .contains(&(table.to_lowercase(), column.to_lowercase())))
    }

    async fn index_exists(&self, table: &str, index: &str) -> DbResult<bool> {
        Ok(self
            .indexes
            .contains(&(table.to_lowercase(), index.to_lowercase())))
    }
}

/// In-memory DuckDB that tracks the largest query result and can fail the
/// n-th parameterised statement matching a fragment.
pub(crate) struct InstrumentedDuckDb {
    inner: DuckDbBackend,
    max_rows: AtomicUsize,
    fail_on: Option<(String, usize)>,
    matched: AtomicUsize,
}

impl InstrumentedDuckDb {
    pub(crate) fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            max_rows: AtomicUsize::new(0),
            fail_on: None,
            matched: AtomicUsize::new(0),
        }
    }

    /// Fail the `nth` (1-based) parameterised statement containing `sql_fragment`.
    pub(crate) fn failing_on_nth(mut self, sql_fragment: &str, nth: usize) -> Self {
        self.fail_on = Some((sql_fragment.to_string(), nth));
        self
    }

    /// Most rows any single query returned
    pub(crate) fn max_rows(&self) -> usize {
        self.max_rows.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseCore for InstrumentedDuckDb {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.inner.execute(sql).await
    }

    async fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        if let Some((fragment, nth)) = &self.fail_on {
            if sql.contains(fragment.as_str())
                && self.matched.fetch_add(1, Ordering::SeqCst) + 1 == *nth
            {
                return Err(DbError::execution("connection lost", sql));
            }
        }
        self.inner.execute_with_params(sql, params).await
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql).await
    }

    async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let rows = self.inner.query_rows(sql, params).await?;
        self.max_rows.fetch_max(rows.len(), Ordering::SeqCst);
        Ok(rows)
    }

    async fn begin(&self) -> DbResult<()> {
        self.inner.begin().await
    }

    async fn commit(&self) -> DbResult<()> {
        self.inner.commit().await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.inner.rollback().await
    }

    fn db_type(&self) -> &'static str {
        self.inner.db_type()
    }
}

#[async_trait]
impl DatabaseSchema for InstrumentedDuckDb {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        self.inner.table_exists(table).await
    }

    async fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        self.inner.column_exists(table, column).await
    }

    async fn index_exists(&self, table: &str, index: &str) -> DbResult<bool> {
        self.inner.index_exists(table, index).await
    }
}
