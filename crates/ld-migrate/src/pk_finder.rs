//! Catalogue lookups for primary key constraints

use crate::context::resolve_dialect;
use crate::error::MigrateResult;
use ld_core::Dialect;
use ld_db::{Database, DatabaseCore, SqlValue};

/// Finds the name of a table's primary key constraint, and on PostgreSQL the
/// sequence owned by a key column.
#[derive(Clone, Copy)]
pub struct DbPrimaryKeyConstraintFinder<'a> {
    db: &'a dyn Database,
}

impl<'a> DbPrimaryKeyConstraintFinder<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Name of the primary key constraint of `table`, if it has one.
    pub async fn find_constraint_name(&self, table: &str) -> MigrateResult<Option<String>> {
        let dialect = resolve_dialect(self.db)?;
        let (sql, table) = constraint_query(dialect, table);
        let rows = self.db.query_rows(sql, &[SqlValue::Text(table)]).await?;
        match rows.first() {
            Some(row) => Ok(row.get_string(0)?),
            None => Ok(None),
        }
    }

    /// Sequence backing `table.column` on PostgreSQL; `None` elsewhere.
    pub async fn postgres_sequence(
        &self,
        table: &str,
        column: &str,
    ) -> MigrateResult<Option<String>> {
        if resolve_dialect(self.db)? != Dialect::PostgreSql {
            return Ok(None);
        }
        let rows = self
            .db
            .query_rows(
                "SELECT pg_get_serial_sequence(?, ?)::text",
                &[table.into(), column.into()],
            )
            .await?;
        match rows.first() {
            Some(row) => Ok(row.get_string(0)?),
            None => Ok(None),
        }
    }
}

/// Catalogue query and the table name as the catalogue stores it.
fn constraint_query(dialect: Dialect, table: &str) -> (&'static str, String) {
    match dialect {
        Dialect::PostgreSql => (
            "SELECT con.conname::text FROM pg_catalog.pg_constraint con \
             INNER JOIN pg_catalog.pg_class rel ON rel.oid = con.conrelid \
             INNER JOIN pg_catalog.pg_namespace nsp ON nsp.oid = connamespace \
             WHERE nsp.nspname = current_schema() AND con.contype = 'p' AND rel.relname = ?",
            table.to_lowercase(),
        ),
        Dialect::MsSql => (
            "SELECT name FROM sys.key_constraints \
             WHERE type = 'PK' AND OBJECT_NAME(parent_object_id) = ?",
            table.to_string(),
        ),
        Dialect::Oracle => (
            "SELECT constraint_name FROM user_constraints \
             WHERE table_name = ? AND constraint_type = 'P'",
            table.to_uppercase(),
        ),
        Dialect::H2 => (
            "SELECT constraint_name FROM information_schema.table_constraints \
             WHERE table_name = ? AND constraint_type = 'PRIMARY KEY'",
            table.to_uppercase(),
        ),
        Dialect::DuckDb => (
            "SELECT constraint_name FROM information_schema.table_constraints \
             WHERE lower(table_name) = ? AND constraint_type = 'PRIMARY KEY'",
            table.to_lowercase(),
        ),
    }
}

#[cfg(test)]
#[path = "pk_finder_test.rs"]
mod tests;
