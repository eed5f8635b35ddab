//! Primary key removal, resolved against the live database

use crate::context::resolve_dialect;
use crate::error::{MigrateError, MigrateResult};
use crate::pk_finder::DbPrimaryKeyConstraintFinder;
use ld_core::{ColumnName, Dialect, TableName};
use ld_db::Database;

/// Looks up the constraint (and PostgreSQL sequence) of a primary key, then
/// produces the dialect's ordered drop statements.
#[derive(Clone, Copy)]
pub struct DropPrimaryKeySqlGenerator<'a> {
    db: &'a dyn Database,
    finder: DbPrimaryKeyConstraintFinder<'a>,
}

impl<'a> DropPrimaryKeySqlGenerator<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self {
            db,
            finder: DbPrimaryKeyConstraintFinder::new(db),
        }
    }

    /// Statements dropping the primary key of `table` on `column`.
    ///
    /// Fails with [`MigrateError::UnsupportedDialect`] before any lookup when
    /// the database reports an unknown dialect.
    pub async fn generate(
        &self,
        table: &TableName,
        column: &ColumnName,
        autogenerated: bool,
    ) -> MigrateResult<Vec<String>> {
        let dialect = resolve_dialect(self.db)?;
        let constraint = self
            .finder
            .find_constraint_name(table)
            .await?
            .ok_or_else(|| MigrateError::ConstraintNotFound {
                table: table.to_string(),
            })?;
        let sequence = match dialect {
            Dialect::PostgreSql => self.finder.postgres_sequence(table, column).await?,
            _ => None,
        };

        Ok(ld_sql::drop_primary_key(
            dialect,
            table,
            column,
            &constraint,
            sequence.as_deref(),
            autogenerated,
        ))
    }
}

#[cfg(test)]
#[path = "drop_primary_key_test.rs"]
mod tests;
