//! PostgreSQL database backend implementation (feature `postgres`)

use crate::error::{DbError, DbResult};
use crate::traits::{DatabaseCore, DatabaseSchema};
use crate::value::{Row, SqlValue};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, Executor, PgConnection, Postgres, Row as _, TypeInfo, ValueRef};
use tokio::sync::Mutex;

/// PostgreSQL database backend
///
/// Statements use `?` placeholders like every other backend; they are
/// rewritten to `$n` before being sent.
pub struct PostgresBackend {
    conn: Mutex<PgConnection>,
}

impl PostgresBackend {
    /// Connect using a `postgres://` URL
    pub async fn connect(url: &str) -> DbResult<Self> {
        let conn = PgConnection::connect(url)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        log::debug!("Connected to PostgreSQL");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    async fn simple(&self, sql: &str) -> DbResult<u64> {
        let mut conn = self.conn.lock().await;
        let result = (&mut *conn)
            .execute(sql)
            .await
            .map_err(|e| DbError::execution(e, sql))?;
        Ok(result.rows_affected())
    }

    async fn transaction(&self, action: &str) -> DbResult<()> {
        let mut conn = self.conn.lock().await;
        (&mut *conn)
            .execute(action)
            .await
            .map_err(|e| DbError::TransactionError {
                action: action.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn query_count(&self, sql: &str, params: &[SqlValue]) -> DbResult<i64> {
        let rows = self.query_rows(sql, params).await?;
        match rows.first() {
            Some(row) => Ok(row.get_i64(0)?.unwrap_or(0)),
            None => Ok(0),
        }
    }
}

/// Rewrite `?` placeholders to PostgreSQL's positional `$n` form.
///
/// Question marks inside quoted literals or identifiers are left alone.
pub(crate) fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => {
                quote = None;
                out.push(c);
            }
            (Some(_), _) => out.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push(c);
            }
            (None, '?') => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            (None, _) => out.push(c),
        }
    }
    out
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Double(d) => query.bind(*d),
            SqlValue::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

/// Decode one column. Types outside the basic scalar set are read as text,
/// so callers should cast exotic columns in the query.
fn decode_column(row: &PgRow, index: usize) -> DbResult<SqlValue> {
    let raw = row.try_get_raw(index).map_err(|e| DbError::ValueError {
        index,
        message: e.to_string(),
    })?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = row.column(index).type_info().name().to_ascii_uppercase();
    let value = match type_name.as_str() {
        "BOOL" => row.try_get::<bool, _>(index).map(SqlValue::Bool),
        "INT2" => row
            .try_get::<i16, _>(index)
            .map(|v| SqlValue::Int(i64::from(v))),
        "INT4" => row
            .try_get::<i32, _>(index)
            .map(|v| SqlValue::Int(i64::from(v))),
        "INT8" => row.try_get::<i64, _>(index).map(SqlValue::Int),
        "FLOAT4" => row
            .try_get::<f32, _>(index)
            .map(|v| SqlValue::Double(f64::from(v))),
        "FLOAT8" => row.try_get::<f64, _>(index).map(SqlValue::Double),
        _ => row.try_get::<String, _>(index).map(SqlValue::Text),
    };
    value.map_err(|e| DbError::ValueError {
        index,
        message: format!("{type_name}: {e}"),
    })
}

fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rfind('.') {
        Some(pos) => (Some(&name[..pos]), &name[pos + 1..]),
        None => (None, name),
    }
}

#[async_trait]
impl DatabaseCore for PostgresBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let affected = self.simple(sql).await?;
        Ok(usize::try_from(affected).unwrap_or(usize::MAX))
    }

    async fn execute_with_params(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let rewritten = rewrite_placeholders(sql);
        let mut conn = self.conn.lock().await;
        let result = bind_params(sqlx::query(&rewritten), params)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::execution(e, sql))?;
        Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.simple(sql).await.map(|_| ())
    }

    async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let rewritten = rewrite_placeholders(sql);
        let mut conn = self.conn.lock().await;
        let pg_rows = bind_params(sqlx::query(&rewritten), params)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| DbError::execution(e, sql))?;

        pg_rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| decode_column(row, i))
                    .collect::<DbResult<Vec<_>>>()
                    .map(Row::new)
            })
            .collect()
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction("BEGIN").await
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction("COMMIT").await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction("ROLLBACK").await
    }

    fn db_type(&self) -> &'static str {
        "postgresql"
    }
}

#[async_trait]
impl DatabaseSchema for PostgresBackend {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self
            .query_count(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = COALESCE(?, current_schema()) \
                 AND lower(table_name) = lower(?)",
                &[schema.into(), table.into()],
            )
            .await?;
        Ok(count > 0)
    }

    async fn column_exists(&self, table: &str, column: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self
            .query_count(
                "SELECT COUNT(*) FROM information_schema.columns \
                 WHERE table_schema = COALESCE(?, current_schema()) \
                 AND lower(table_name) = lower(?) AND lower(column_name) = lower(?)",
                &[schema.into(), table.into(), column.into()],
            )
            .await?;
        Ok(count > 0)
    }

    async fn index_exists(&self, table: &str, index: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified(table);
        let count = self
            .query_count(
                "SELECT COUNT(*) FROM pg_indexes \
                 WHERE schemaname = COALESCE(?, current_schema()) \
                 AND lower(tablename) = lower(?) AND lower(indexname) = lower(?)",
                &[schema.into(), table.into(), index.into()],
            )
            .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
