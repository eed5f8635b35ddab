//! `CREATE TABLE` generator

use crate::column::ColumnDef;
use crate::error::{SqlError, SqlResult};
use ld_core::{Dialect, TableName};

/// Builds a `CREATE TABLE` statement with an optional named primary key.
///
/// The primary key constraint is named `pk_<table>` (schema prefix removed).
#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    dialect: Dialect,
    table: TableName,
    columns: Vec<ColumnDef>,
    pk_columns: Vec<ColumnDef>,
}

impl CreateTableBuilder {
    pub fn new(dialect: Dialect, table: TableName) -> Self {
        Self {
            dialect,
            table,
            columns: Vec::new(),
            pk_columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a column that is part of the primary key. It is always `NOT NULL`.
    pub fn add_pk_column(mut self, column: ColumnDef) -> Self {
        self.pk_columns.push(column.not_null());
        self
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn build(&self) -> SqlResult<Vec<String>> {
        if self.pk_columns.is_empty() && self.columns.is_empty() {
            return Err(SqlError::ValidationError(format!(
                "table '{}' must have at least one column",
                self.table
            )));
        }

        let mut clauses: Vec<String> = self
            .pk_columns
            .iter()
            .chain(&self.columns)
            .map(|c| c.sql(self.dialect))
            .collect();

        if !self.pk_columns.is_empty() {
            let pk_columns: Vec<&str> = self.pk_columns.iter().map(|c| c.name().as_str()).collect();
            clauses.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                self.pk_name(),
                pk_columns.join(", ")
            ));
        }

        Ok(vec![format!(
            "CREATE TABLE {} ({})",
            self.table,
            clauses.join(", ")
        )])
    }

    fn pk_name(&self) -> String {
        let bare = self.table.rsplit('.').next().unwrap_or(self.table.as_str());
        format!("pk_{bare}")
    }
}

#[cfg(test)]
#[path = "create_table_test.rs"]
mod tests;
