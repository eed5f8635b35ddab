//! Index DDL generators

use crate::error::{SqlError, SqlResult};
use ld_core::{ColumnName, Dialect, IndexName, TableName};

/// Builds a `CREATE [UNIQUE] INDEX` statement.
///
/// The statement is identical across dialects. Whether an index of that name
/// already exists is the caller's check, so the builder stays pure.
#[derive(Debug, Clone, Default)]
pub struct CreateIndexBuilder {
    table: Option<TableName>,
    name: Option<IndexName>,
    columns: Vec<ColumnName>,
    unique: bool,
}

impl CreateIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableName) -> Self {
        self.table = Some(table);
        self
    }

    pub fn name(mut self, name: IndexName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn add_column(mut self, column: ColumnName) -> Self {
        self.columns.push(column);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn build(&self) -> SqlResult<Vec<String>> {
        let table = required(self.table.as_ref(), "table")?;
        let name = required(self.name.as_ref(), "index name")?;
        if self.columns.is_empty() {
            return Err(SqlError::ValidationError(format!(
                "index '{name}' must have at least one column"
            )));
        }

        let columns: Vec<&str> = self.columns.iter().map(ColumnName::as_str).collect();
        Ok(vec![format!(
            "CREATE {}INDEX {} ON {} ({})",
            if self.unique { "UNIQUE " } else { "" },
            name,
            table,
            columns.join(", ")
        )])
    }
}

/// Builds the dialect-specific statement dropping an index.
#[derive(Debug, Clone)]
pub struct DropIndexBuilder {
    dialect: Dialect,
    table: Option<TableName>,
    name: Option<IndexName>,
}

impl DropIndexBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: None,
            name: None,
        }
    }

    pub fn table(mut self, table: TableName) -> Self {
        self.table = Some(table);
        self
    }

    pub fn name(mut self, name: IndexName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn build(&self) -> SqlResult<Vec<String>> {
        let table = required(self.table.as_ref(), "table")?;
        let name = required(self.name.as_ref(), "index name")?;
        let sql = match self.dialect {
            Dialect::MsSql => format!("DROP INDEX {name} ON {table}"),
            Dialect::PostgreSql | Dialect::Oracle | Dialect::H2 | Dialect::DuckDb => {
                format!("DROP INDEX {name}")
            }
        };
        Ok(vec![sql])
    }
}

fn required<'a, T>(value: Option<&'a T>, what: &str) -> SqlResult<&'a T> {
    value.ok_or_else(|| SqlError::ValidationError(format!("{what} must not be missing")))
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
