//! SQL parser wrapper

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use ld_core::Dialect;
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: SqlDialect,
}

impl SqlParser {
    /// Create a parser for the given dialect
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect: SqlDialect::new(dialect),
        }
    }

    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self::for_dialect(Dialect::DuckDb)
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL that must hold exactly one statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let mut stmts = self.parse(sql)?;
        match stmts.len() {
            0 => Err(SqlError::EmptySql),
            1 => Ok(stmts.remove(0)),
            n => Err(SqlError::ValidationError(format!(
                "expected a single statement, found {n}"
            ))),
        }
    }

    /// The dialect this parser reads
    pub fn dialect(&self) -> Dialect {
        self.dialect.dialect()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::duckdb()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
