//! Batched select-then-update for data changes

use crate::error::MigrateResult;
use ld_core::Dialect;
use ld_db::{Database, DatabaseCore, Row, SqlValue};
use ld_sql::{
    count_rows, paged_select, validate_data_modification, validate_select, SqlError, SqlParser,
};

/// Counters reported by [`MassUpdate::execute`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MassUpdateStats {
    pub rows_selected: usize,
    pub rows_updated: usize,
    pub rows_skipped: usize,
    pub batches: usize,
}

/// Select rows needing a change, then run a parameterised update for each.
///
/// The select must narrow to the rows still needing the transformation so
/// that a second run finds nothing. Rows are fetched `batch_size` at a time:
/// after each committed batch the select runs again, skipping only the rows
/// the handler left alone, so at most one batch is held in memory. The rows
/// counted up front bound the run, even for a select that does not narrow.
/// Selects that may skip rows should carry an `ORDER BY`.
pub struct MassUpdate<'a> {
    db: &'a dyn Database,
    dialect: Dialect,
    batch_size: usize,
    select: Option<(String, Vec<SqlValue>)>,
    update: Option<String>,
}

impl<'a> MassUpdate<'a> {
    pub fn new(db: &'a dyn Database, dialect: Dialect, batch_size: usize) -> Self {
        Self {
            db,
            dialect,
            batch_size: batch_size.max(1),
            select: None,
            update: None,
        }
    }

    pub fn select(mut self, sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        self.select = Some((sql.into(), binds));
        self
    }

    pub fn update(mut self, sql: impl Into<String>) -> Self {
        self.update = Some(sql.into());
        self
    }

    /// Run the update.
    ///
    /// `handler` maps each selected row to the update parameters, or `None`
    /// to leave the row alone. A failing batch is rolled back and the error
    /// returned; batches already committed stay committed.
    pub async fn execute<F>(self, mut handler: F) -> MigrateResult<MassUpdateStats>
    where
        F: FnMut(&Row) -> MigrateResult<Option<Vec<SqlValue>>> + Send,
    {
        let (select_sql, binds) = self.select.ok_or_else(|| {
            SqlError::ValidationError("mass update has no select statement".to_string())
        })?;
        let update_sql = self.update.ok_or_else(|| {
            SqlError::ValidationError("mass update has no update statement".to_string())
        })?;

        let parser = SqlParser::for_dialect(self.dialect);
        validate_select(&parser, &select_sql)?;
        validate_data_modification(&parser, &update_sql)?;

        let total = count_selected(self.db, &select_sql, &binds).await?;
        log::debug!("Mass update has {total} rows to process");

        let mut stats = MassUpdateStats::default();
        while stats.rows_selected < total {
            let limit = self.batch_size.min(total - stats.rows_selected);
            let page_sql = paged_select(self.dialect, &select_sql, limit, stats.rows_skipped);
            let batch = self.db.query_rows(&page_sql, &binds).await?;
            if batch.is_empty() {
                break;
            }
            stats.rows_selected += batch.len();

            self.db.begin().await?;
            match apply_batch(self.db, &update_sql, &batch, &mut handler).await {
                Ok((updated, skipped)) => {
                    self.db.commit().await?;
                    stats.rows_updated += updated;
                    stats.rows_skipped += skipped;
                    stats.batches += 1;
                    log::debug!(
                        "Mass update batch {}: {updated} updated, {skipped} skipped",
                        stats.batches
                    );
                }
                Err(e) => {
                    if let Err(rollback_err) = self.db.rollback().await {
                        log::warn!("Rollback after failed mass update batch failed: {rollback_err}");
                    }
                    return Err(e);
                }
            }
            if batch.len() < limit {
                break;
            }
        }

        Ok(stats)
    }
}

async fn count_selected(
    db: &dyn Database,
    select_sql: &str,
    binds: &[SqlValue],
) -> MigrateResult<usize> {
    let rows = db.query_rows(&count_rows(select_sql), binds).await?;
    let count = match rows.first() {
        Some(row) => row.get_i64(0)?.unwrap_or_default(),
        None => 0,
    };
    Ok(usize::try_from(count).unwrap_or_default())
}

async fn apply_batch<F>(
    db: &dyn Database,
    update_sql: &str,
    batch: &[Row],
    handler: &mut F,
) -> MigrateResult<(usize, usize)>
where
    F: FnMut(&Row) -> MigrateResult<Option<Vec<SqlValue>>> + Send,
{
    let (mut updated, mut skipped) = (0, 0);
    for row in batch {
        match handler(row)? {
            Some(params) => {
                db.execute_with_params(update_sql, &params).await?;
                updated += 1;
            }
            None => skipped += 1,
        }
    }
    Ok((updated, skipped))
}

#[cfg(test)]
#[path = "mass_update_test.rs"]
mod tests;
