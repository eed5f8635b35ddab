//! ld-sql - SQL layer for Ladder
//!
//! This crate provides the pure, dialect-aware generators that turn a
//! structural intent (create a table, drop an index, drop a primary key...)
//! into an ordered list of SQL statements, plus a sqlparser-rs wrapper used to
//! validate hand-written migration queries before they run.

pub mod column;
pub mod create_table;
pub mod dialect;
pub mod drop_columns;
pub mod error;
pub mod index;
pub mod paging;
pub mod parser;
pub mod primary_key;
pub mod validator;

pub use column::{ColumnDef, ColumnType};
pub use create_table::CreateTableBuilder;
pub use dialect::SqlDialect;
pub use drop_columns::DropColumnsBuilder;
pub use error::{SqlError, SqlResult};
pub use index::{CreateIndexBuilder, DropIndexBuilder};
pub use paging::{count_rows, paged_select};
pub use parser::SqlParser;
pub use primary_key::{drop_primary_key, oracle_sequence_name, oracle_trigger_name};
pub use validator::{validate_data_modification, validate_select};
