//! Strongly-typed identifiers used by the SQL generators.

use crate::newtype_string::define_identifier;

define_identifier! {
    /// A table name, optionally schema-qualified (`schema.table`).
    pub struct TableName;
}

define_identifier! {
    /// A column name.
    pub struct ColumnName;
}

define_identifier! {
    /// An index name.
    pub struct IndexName;
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
