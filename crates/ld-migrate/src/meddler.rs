//! Backfill of the ledger for installations that predate it
//!
//! Before the ledger existed, an installation only kept a schema version
//! number in `schema_info`. On the first run against such a database the
//! meddler creates the ledger and seeds one record per step that the legacy
//! version already covers, so those steps are never replayed.

use crate::clock::Clock;
use crate::error::{HistoryError, MigrateResult};
use crate::history::{create_history_table, MigrationHistory};
use crate::step::StepId;
use ld_core::Dialect;
use ld_db::{Database, DatabaseCore, DatabaseSchema};

/// Table holding the legacy schema version marker
pub const LEGACY_TABLE: &str = "schema_info";

/// Legacy schema versions and the last step each one already includes,
/// ascending.
const LEGACY_VERSIONS: &[(i64, u32)] = &[(8_900, 2), (9_000, 5), (9_100, 10)];

/// Last step covered by a legacy schema version.
pub(crate) fn legacy_last_step(version: i64) -> Result<StepId, HistoryError> {
    LEGACY_VERSIONS
        .iter()
        .rev()
        .find(|(legacy, _)| *legacy <= version)
        .map(|(_, step)| StepId::new(*step))
        .ok_or(HistoryError::UnsupportedLegacyVersion {
            version,
            oldest: LEGACY_VERSIONS[0].0,
        })
}

pub struct MigrationHistoryMeddler<'a> {
    db: &'a dyn Database,
    dialect: Dialect,
    clock: &'a dyn Clock,
}

impl<'a> MigrationHistoryMeddler<'a> {
    pub fn new(db: &'a dyn Database, dialect: Dialect, clock: &'a dyn Clock) -> Self {
        Self { db, dialect, clock }
    }

    /// Seed the ledger from the legacy marker when needed.
    ///
    /// Returns the last seeded step, or `None` when there was nothing to do:
    /// the ledger already exists, or there is no legacy marker.
    pub async fn meddle(&self) -> MigrateResult<Option<StepId>> {
        let Some(last) = self.pending_seed().await? else {
            return Ok(None);
        };
        log::info!("Legacy schema version found; seeding migration history up to step {last}");

        self.db.begin().await?;
        match self.seed(last).await {
            Ok(()) => {
                self.db.commit().await?;
                Ok(Some(last))
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback().await {
                    log::warn!("Rollback after failed history seeding failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    /// Create the ledger and record steps 1..=`last`. Runs inside the
    /// caller's transaction, so a failure leaves no partial ledger behind.
    async fn seed(&self, last: StepId) -> MigrateResult<()> {
        for sql in create_history_table(self.dialect)? {
            self.db.execute(&sql).await?;
        }
        let history = MigrationHistory::new(self.db);
        let now = self.clock.now_millis();
        for id in StepId::FIRST.get()..=last.get() {
            history.record_applied(StepId::new(id), now).await?;
        }
        Ok(())
    }

    /// The step [`Self::meddle`] would seed up to, without writing anything.
    pub async fn pending_seed(&self) -> MigrateResult<Option<StepId>> {
        let history = MigrationHistory::new(self.db);
        if history.is_initialized().await? || !self.db.table_exists(LEGACY_TABLE).await? {
            return Ok(None);
        }

        let rows = self
            .db
            .query_rows(&format!("SELECT MAX(version) FROM {LEGACY_TABLE}"), &[])
            .await?;
        match rows.first().map(|r| r.get_i64(0)).transpose()?.flatten() {
            Some(version) => Ok(Some(legacy_last_step(version)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "meddler_test.rs"]
mod tests;
