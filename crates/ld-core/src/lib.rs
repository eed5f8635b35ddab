//! ld-core - Core library for Ladder
//!
//! This crate provides the types shared by every Ladder component: the closed
//! set of SQL dialects, strongly-typed identifier names, and `ladder.yml`
//! configuration parsing.

pub mod config;
pub mod dialect;
pub mod error;
pub mod names;
mod newtype_string;

pub use config::{Config, DatabaseConfig, DbType, MigrationConfig};
pub use dialect::Dialect;
pub use error::{CoreError, CoreResult};
pub use names::{ColumnName, IndexName, TableName};
