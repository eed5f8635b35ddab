//! Primary key removal plan

use ld_core::{ColumnName, Dialect, TableName};

/// Name of the trigger Oracle installs to fill an autogenerated key column.
pub fn oracle_trigger_name(table: &TableName) -> String {
    format!("{table}_IDT")
}

/// Name of the sequence backing an autogenerated key column on Oracle.
pub fn oracle_sequence_name(table: &TableName) -> String {
    format!("{table}_SEQ")
}

/// Ordered statements dropping the primary key `constraint` of `table`.
///
/// `pg_sequence` is the PostgreSQL sequence owned by `column`, if any; it is
/// ignored on other dialects. `autogenerated` tells whether the key was
/// created with a value generator, which on Oracle means a trigger and a
/// sequence to clean up first.
pub fn drop_primary_key(
    dialect: Dialect,
    table: &TableName,
    column: &ColumnName,
    constraint: &str,
    pg_sequence: Option<&str>,
    autogenerated: bool,
) -> Vec<String> {
    match dialect {
        Dialect::PostgreSql => {
            let mut statements = vec![format!(
                "ALTER TABLE {table} ALTER COLUMN {column} DROP DEFAULT"
            )];
            if let Some(sequence) = pg_sequence {
                statements.push(format!("DROP SEQUENCE {sequence}"));
            }
            statements.push(format!("ALTER TABLE {table} DROP CONSTRAINT {constraint}"));
            statements
        }
        Dialect::Oracle => {
            let mut statements = Vec::with_capacity(3);
            if autogenerated {
                statements.push(format!("DROP TRIGGER {}", oracle_trigger_name(table)));
                statements.push(format!("DROP SEQUENCE {}", oracle_sequence_name(table)));
            }
            statements.push(format!(
                "ALTER TABLE {table} DROP CONSTRAINT {constraint} DROP INDEX"
            ));
            statements
        }
        Dialect::MsSql | Dialect::H2 | Dialect::DuckDb => {
            vec![format!("ALTER TABLE {table} DROP CONSTRAINT {constraint}")]
        }
    }
}

#[cfg(test)]
#[path = "primary_key_test.rs"]
mod tests;
