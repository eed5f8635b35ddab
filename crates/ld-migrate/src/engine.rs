//! Composition root for host applications
//!
//! Builds the step catalogue from every release provider and hands the
//! database, the catalogue and the clock to a [`MigrationRunner`].

use crate::clock::{Clock, SystemClock};
use crate::context::resolve_dialect;
use crate::error::{MigrateError, MigrateResult};
use crate::history::{MigrationHistory, MigrationHistoryRecord};
use crate::meddler::MigrationHistoryMeddler;
use crate::registry::{MigrationStepRegistry, MigrationSteps};
use crate::runner::{MigrationRunner, RunSummary};
use crate::status::{MigrationStatus, StatusReport};
use crate::step::{MigrationStep, StepId};
use crate::version;
use ld_core::MigrationConfig;
use ld_db::Database;
use std::sync::Arc;

pub struct MigrationEngine {
    db: Arc<dyn Database>,
    steps: MigrationSteps,
    config: MigrationConfig,
    clock: Arc<dyn Clock>,
}

impl MigrationEngine {
    /// Engine over the full release catalogue.
    pub fn new(db: Arc<dyn Database>, config: MigrationConfig) -> MigrateResult<Self> {
        let mut registry = MigrationStepRegistry::new();
        version::register_all(&mut registry);
        Ok(Self::with_steps(db, registry.build()?, config))
    }

    /// Engine over a custom catalogue
    pub fn with_steps(
        db: Arc<dyn Database>,
        steps: MigrationSteps,
        config: MigrationConfig,
    ) -> Self {
        Self {
            db,
            steps,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn steps(&self) -> &MigrationSteps {
        &self.steps
    }

    /// Apply every pending step.
    pub async fn run(&self) -> MigrateResult<RunSummary> {
        MigrationRunner::new(
            self.db.as_ref(),
            &self.steps,
            self.config.batch_size,
            self.clock.as_ref(),
        )
        .run()
        .await
    }

    /// Compare the ledger with the catalogue without changing anything.
    ///
    /// A database that only carries a legacy version marker reports the
    /// steps that marker covers as applied.
    pub async fn status(&self) -> MigrateResult<StatusReport> {
        let last_applied = self.last_applied().await?;
        Ok(StatusReport::new(last_applied, self.steps.max_id()))
    }

    /// Steps the next [`Self::run`] would execute
    pub async fn pending(&self) -> MigrateResult<&[MigrationStep]> {
        let report = self.status().await?;
        if report.status == MigrationStatus::RequiresDowngrade {
            return Err(MigrateError::RequiresDowngrade {
                applied: report.last_applied.unwrap_or(report.latest),
                latest: report.latest,
            });
        }
        Ok(self.steps.steps_after(report.last_applied))
    }

    /// Ledger contents, ascending
    pub async fn records(&self) -> MigrateResult<Vec<MigrationHistoryRecord>> {
        MigrationHistory::new(self.db.as_ref()).records().await
    }

    async fn last_applied(&self) -> MigrateResult<Option<StepId>> {
        let db = self.db.as_ref();
        let dialect = resolve_dialect(db)?;
        let seed = MigrationHistoryMeddler::new(db, dialect, self.clock.as_ref())
            .pending_seed()
            .await?;
        match seed {
            Some(last) => Ok(Some(last)),
            None => MigrationHistory::new(db).last_applied_id().await,
        }
    }
}
