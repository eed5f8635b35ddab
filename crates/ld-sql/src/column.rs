//! Column definitions and their per-dialect SQL types

use ld_core::{ColumnName, Dialect};

/// Portable column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    BigInt,
    Boolean,
    /// Variable-length string with a maximum length in characters
    Varchar(u32),
    /// Unbounded text
    Clob,
    /// Fixed-point number, precision 38 scale 20
    Decimal,
}

impl ColumnType {
    /// SQL type name for `dialect`.
    pub fn sql(self, dialect: Dialect) -> String {
        match (self, dialect) {
            (ColumnType::Integer, Dialect::MsSql) => "INT".to_string(),
            (ColumnType::Integer, Dialect::Oracle) => "NUMBER(38,0)".to_string(),
            (ColumnType::Integer, Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb) => {
                "INTEGER".to_string()
            }

            (ColumnType::BigInt, Dialect::Oracle) => "NUMBER(38)".to_string(),
            (ColumnType::BigInt, _) => "BIGINT".to_string(),

            (ColumnType::Boolean, Dialect::MsSql) => "BIT".to_string(),
            (ColumnType::Boolean, Dialect::Oracle) => "NUMBER(1)".to_string(),
            (ColumnType::Boolean, Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb) => {
                "BOOLEAN".to_string()
            }

            (ColumnType::Varchar(n), Dialect::MsSql) => format!("NVARCHAR({n})"),
            (ColumnType::Varchar(n), Dialect::Oracle) => format!("VARCHAR2({n} CHAR)"),
            (ColumnType::Varchar(n), Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb) => {
                format!("VARCHAR({n})")
            }

            (ColumnType::Clob, Dialect::PostgreSql) => "TEXT".to_string(),
            (ColumnType::Clob, Dialect::MsSql) => "NVARCHAR(MAX)".to_string(),
            (ColumnType::Clob, Dialect::Oracle | Dialect::H2) => "CLOB".to_string(),
            (ColumnType::Clob, Dialect::DuckDb) => "VARCHAR".to_string(),

            (ColumnType::Decimal, Dialect::PostgreSql) => "NUMERIC(38,20)".to_string(),
            (ColumnType::Decimal, Dialect::MsSql) => "DECIMAL(38,20)".to_string(),
            (ColumnType::Decimal, Dialect::Oracle) => "NUMBER(38,20)".to_string(),
            (ColumnType::Decimal, Dialect::H2 | Dialect::DuckDb) => "DOUBLE".to_string(),
        }
    }
}

/// A column of a table being created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: ColumnName,
    column_type: ColumnType,
    nullable: bool,
}

impl ColumnDef {
    /// Nullable column
    pub fn new(name: ColumnName, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn name(&self) -> &ColumnName {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Column definition clause, e.g. `uuid VARCHAR(40) NOT NULL`
    pub fn sql(&self, dialect: Dialect) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type.sql(dialect));
        if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

#[cfg(test)]
#[path = "column_test.rs"]
mod tests;
