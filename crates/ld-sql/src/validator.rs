//! Statement validation for hand-written migration queries

use crate::error::{SqlError, SqlResult};
use crate::parser::SqlParser;
use sqlparser::ast::Statement;

/// Validate that `sql` is a single query (a `SELECT`, possibly with joins or
/// set operations).
pub fn validate_select(parser: &SqlParser, sql: &str) -> SqlResult<()> {
    match parser.parse_single(sql)? {
        Statement::Query(_) => Ok(()),
        other => Err(SqlError::UnsupportedStatement(format!(
            "expected a SELECT query, found: {}",
            statement_kind(&other)
        ))),
    }
}

/// Validate that `sql` is a single `UPDATE`, `DELETE` or `INSERT` statement.
pub fn validate_data_modification(parser: &SqlParser, sql: &str) -> SqlResult<()> {
    match parser.parse_single(sql)? {
        Statement::Update { .. } | Statement::Delete(_) | Statement::Insert(_) => Ok(()),
        other => Err(SqlError::UnsupportedStatement(format!(
            "expected UPDATE, DELETE or INSERT, found: {}",
            statement_kind(&other)
        ))),
    }
}

/// First keyword of the rendered statement, for error messages.
fn statement_kind(statement: &Statement) -> String {
    statement
        .to_string()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
