//! Mapping from Ladder dialects to sqlparser-rs dialects

use ld_core::Dialect;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    Dialect as ParserDialect, DuckDbDialect, GenericDialect, MsSqlDialect,
};
use sqlparser::parser::Parser;

use crate::error::{SqlError, SqlResult};

/// A Ladder dialect paired with the sqlparser dialect used to read its SQL.
///
/// Oracle and H2 have no dedicated sqlparser dialect and use the generic one.
/// PostgreSQL also reads through the generic dialect: statements carry `?`
/// placeholders, which the PostgreSQL dialect tokenizes as a jsonb operator.
pub struct SqlDialect {
    dialect: Dialect,
    parser_dialect: Box<dyn ParserDialect + Send + Sync>,
}

impl SqlDialect {
    pub fn new(dialect: Dialect) -> Self {
        let parser_dialect: Box<dyn ParserDialect + Send + Sync> = match dialect {
            Dialect::MsSql => Box::new(MsSqlDialect {}),
            Dialect::PostgreSql | Dialect::Oracle | Dialect::H2 => Box::new(GenericDialect {}),
            Dialect::DuckDb => Box::new(DuckDbDialect {}),
        };
        Self {
            dialect,
            parser_dialect,
        }
    }

    /// The Ladder dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect.as_ref(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }
}

/// Parse line and column from sqlparser error message.
///
/// `ParserError` is a plain string wrapper, so "Line: N, Column: M" is read
/// back out of the message text. Returns `(0, 0)` when absent.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
