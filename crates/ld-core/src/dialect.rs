//! The closed set of SQL dialects Ladder can migrate.
//!
//! Dialect detection is the database backend's job: every backend reports a
//! dialect id (see `ld_db::DatabaseCore::db_type`) which is resolved here with
//! [`Dialect::from_id`]. Generators match exhaustively on [`Dialect`], so a new
//! variant fails to compile until every generator handles it.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL vendor targeted by a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL
    #[serde(rename = "postgresql")]
    PostgreSql,
    /// Microsoft SQL Server
    MsSql,
    /// Oracle
    Oracle,
    /// H2 embedded database
    H2,
    /// DuckDB embedded database
    DuckDb,
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 5] = [
        Dialect::PostgreSql,
        Dialect::MsSql,
        Dialect::Oracle,
        Dialect::H2,
        Dialect::DuckDb,
    ];

    /// Stable identifier, as reported by database backends.
    pub fn id(self) -> &'static str {
        match self {
            Dialect::PostgreSql => "postgresql",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::H2 => "h2",
            Dialect::DuckDb => "duckdb",
        }
    }

    /// Resolve a dialect id (case-insensitive).
    ///
    /// Unknown ids fail with [`CoreError::UnsupportedDialect`].
    pub fn from_id(id: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| CoreError::UnsupportedDialect { id: id.to_string() })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
