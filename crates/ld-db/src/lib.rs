//! ld-db - Database abstraction layer for Ladder
//!
//! This crate provides the `Database` traits the migration engine runs
//! against, an embedded DuckDB implementation, and (behind the `postgres`
//! feature) a PostgreSQL implementation.

pub mod duckdb;
pub mod error;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
pub use traits::{Database, DatabaseCore, DatabaseSchema};
pub use value::{Row, SqlValue};
