//! `DROP COLUMN` generator

use crate::error::{SqlError, SqlResult};
use ld_core::{ColumnName, Dialect, TableName};

/// Builds the statements dropping one or more columns from a table.
#[derive(Debug, Clone)]
pub struct DropColumnsBuilder {
    dialect: Dialect,
    table: TableName,
    columns: Vec<ColumnName>,
}

impl DropColumnsBuilder {
    pub fn new(
        dialect: Dialect,
        table: TableName,
        columns: impl IntoIterator<Item = ColumnName>,
    ) -> Self {
        Self {
            dialect,
            table,
            columns: columns.into_iter().collect(),
        }
    }

    pub fn build(&self) -> SqlResult<Vec<String>> {
        if self.columns.is_empty() {
            return Err(SqlError::ValidationError(format!(
                "no column to drop from '{}'",
                self.table
            )));
        }

        let table = &self.table;
        let joined = || {
            self.columns
                .iter()
                .map(ColumnName::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        Ok(match self.dialect {
            Dialect::Oracle => vec![format!("ALTER TABLE {table} DROP ({})", joined())],
            Dialect::MsSql => vec![format!("ALTER TABLE {table} DROP COLUMN {}", joined())],
            Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb => self
                .columns
                .iter()
                .map(|c| format!("ALTER TABLE {table} DROP COLUMN {c}"))
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "drop_columns_test.rs"]
mod tests;
