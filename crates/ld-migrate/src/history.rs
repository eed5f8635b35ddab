//! Ledger of applied migration steps

use crate::error::{HistoryError, MigrateError, MigrateResult};
use crate::step::StepId;
use chrono::{DateTime, Utc};
use ld_core::{ColumnName, Dialect, TableName};
use ld_db::{Database, DatabaseCore, DatabaseSchema, SqlValue};
use ld_sql::{ColumnDef, ColumnType, CreateTableBuilder};
use serde::Serialize;

/// Name of the ledger table
pub const HISTORY_TABLE: &str = "schema_migrations";

/// `CREATE TABLE` plan for the ledger.
///
/// The ledger is created by the first step of the catalogue, not by the
/// engine itself.
pub(crate) fn create_history_table(dialect: Dialect) -> MigrateResult<Vec<String>> {
    let statements = CreateTableBuilder::new(dialect, TableName::new(HISTORY_TABLE))
        .add_pk_column(ColumnDef::new(
            ColumnName::new("step_id"),
            ColumnType::Integer,
        ))
        .add_column(ColumnDef::new(ColumnName::new("applied_at"), ColumnType::BigInt).not_null())
        .build()?;
    Ok(statements)
}

/// One applied step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationHistoryRecord {
    pub step_id: StepId,
    /// Epoch milliseconds
    pub applied_at: i64,
}

impl MigrationHistoryRecord {
    pub fn applied_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.applied_at)
    }
}

fn to_step_id(value: i64) -> MigrateResult<StepId> {
    u32::try_from(value)
        .map(StepId::new)
        .map_err(|_| MigrateError::InvalidRow(format!("invalid step id {value} in {HISTORY_TABLE}")))
}

/// Read/append access to the ledger
#[derive(Clone, Copy)]
pub struct MigrationHistory<'a> {
    db: &'a dyn Database,
}

impl<'a> MigrationHistory<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Whether the ledger table exists yet
    pub async fn is_initialized(&self) -> MigrateResult<bool> {
        Ok(self.db.table_exists(HISTORY_TABLE).await?)
    }

    /// Highest applied step, `None` on a fresh installation.
    pub async fn last_applied_id(&self) -> MigrateResult<Option<StepId>> {
        if !self.is_initialized().await? {
            return Ok(None);
        }
        let rows = self
            .db
            .query_rows(&format!("SELECT MAX(step_id) FROM {HISTORY_TABLE}"), &[])
            .await?;
        match rows.first() {
            Some(row) => row.get_i64(0)?.map(to_step_id).transpose(),
            None => Ok(None),
        }
    }

    /// Append a record; `id` must directly follow the last applied step.
    pub async fn record_applied(&self, id: StepId, applied_at: i64) -> MigrateResult<()> {
        if !self.is_initialized().await? {
            return Err(HistoryError::TableMissing {
                table: HISTORY_TABLE.to_string(),
            }
            .into());
        }

        let expected = match self.last_applied_id().await? {
            None => StepId::FIRST,
            Some(last) => last.next().ok_or(HistoryError::StepIdOverflow { last })?,
        };
        if id != expected {
            return Err(HistoryError::OutOfOrder { expected, got: id }.into());
        }

        self.db
            .execute_with_params(
                &format!("INSERT INTO {HISTORY_TABLE} (step_id, applied_at) VALUES (?, ?)"),
                &[SqlValue::Int(i64::from(id.get())), SqlValue::Int(applied_at)],
            )
            .await?;
        log::debug!("Recorded migration step {id} as applied");
        Ok(())
    }

    /// Every record, ascending by step id
    pub async fn records(&self) -> MigrateResult<Vec<MigrationHistoryRecord>> {
        if !self.is_initialized().await? {
            return Ok(Vec::new());
        }
        let rows = self
            .db
            .query_rows(
                &format!("SELECT step_id, applied_at FROM {HISTORY_TABLE} ORDER BY step_id"),
                &[],
            )
            .await?;

        rows.iter()
            .map(|row| {
                let step_id = row
                    .get_i64(0)?
                    .ok_or_else(|| MigrateError::InvalidRow("null step_id".to_string()))?;
                Ok(MigrationHistoryRecord {
                    step_id: to_step_id(step_id)?,
                    applied_at: row.get_i64(1)?.unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
