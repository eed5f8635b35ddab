//! Executes the steps the ledger has not seen yet
//!
//! The runner moves `Idle -> Planning -> Executing(id) -> Completed`, or ends
//! in `Failed`. Each step is recorded in the ledger before the next one
//! starts, and the first failure stops the run.

use crate::clock::Clock;
use crate::context::{resolve_dialect, DataContext, DdlContext};
use crate::error::{MigrateError, MigrateResult};
use crate::history::MigrationHistory;
use crate::meddler::MigrationHistoryMeddler;
use crate::registry::MigrationSteps;
use crate::step::{Change, MigrationStep, StepId};
use ld_core::Dialect;
use ld_db::Database;
use serde::Serialize;
use std::time::Instant;

/// Runner state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Planning,
    Executing(StepId),
    Completed,
    /// `id` is `None` when the run failed while planning.
    Failed {
        id: Option<StepId>,
        cause: String,
    },
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Steps applied by this run, ascending
    pub applied: Vec<StepId>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

pub struct MigrationRunner<'a> {
    db: &'a dyn Database,
    steps: &'a MigrationSteps,
    batch_size: usize,
    clock: &'a dyn Clock,
    state: RunnerState,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(
        db: &'a dyn Database,
        steps: &'a MigrationSteps,
        batch_size: usize,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            db,
            steps,
            batch_size,
            clock,
            state: RunnerState::Idle,
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Apply every pending step, in order.
    ///
    /// Running again once everything is applied is a successful no-op.
    pub async fn run(&mut self) -> MigrateResult<RunSummary> {
        let started = Instant::now();
        self.state = RunnerState::Planning;

        let (dialect, plan) = match self.plan().await {
            Ok(planned) => planned,
            Err(e) => {
                self.state = RunnerState::Failed {
                    id: None,
                    cause: e.to_string(),
                };
                return Err(e);
            }
        };
        if plan.is_empty() {
            log::info!("Database is up to date, no migration step to run");
        } else {
            log::info!(
                "Running {} migration steps ({} to {})",
                plan.len(),
                plan[0].id(),
                plan[plan.len() - 1].id()
            );
        }

        let mut summary = RunSummary::default();
        for step in plan {
            self.state = RunnerState::Executing(step.id());
            if let Err(e) = self.apply(step, dialect).await {
                log::error!("Migration step {} failed: {e}", step.id());
                self.state = RunnerState::Failed {
                    id: Some(step.id()),
                    cause: e.to_string(),
                };
                return Err(MigrateError::StepFailed {
                    id: step.id(),
                    description: step.description().to_string(),
                    source: Box::new(e),
                });
            }
            summary.applied.push(step.id());
        }

        self.state = RunnerState::Completed;
        summary.elapsed_ms = elapsed_ms(started);
        if !summary.is_noop() {
            log::info!(
                "Applied {} migration steps in {} ms",
                summary.applied.len(),
                summary.elapsed_ms
            );
        }
        Ok(summary)
    }

    async fn plan(&self) -> MigrateResult<(Dialect, &'a [MigrationStep])> {
        let dialect = resolve_dialect(self.db)?;
        MigrationHistoryMeddler::new(self.db, dialect, self.clock)
            .meddle()
            .await?;

        let last_applied = MigrationHistory::new(self.db).last_applied_id().await?;
        let latest = self.steps.max_id();
        if let Some(applied) = last_applied.filter(|applied| *applied > latest) {
            return Err(MigrateError::RequiresDowngrade { applied, latest });
        }

        let plan = self.steps.steps_after(last_applied);
        log::debug!(
            "Migration plan on {dialect}: last applied {}, {} steps pending",
            last_applied.map_or_else(|| "none".to_string(), |id| id.to_string()),
            plan.len()
        );
        Ok((dialect, plan))
    }

    /// Execute one step, then record it. The ledger write happens only after
    /// the change itself succeeded.
    async fn apply(&self, step: &MigrationStep, dialect: Dialect) -> MigrateResult<()> {
        let started = Instant::now();
        log::info!("#{} '{}'...", step.id(), step.description());

        match step.change() {
            Change::Ddl(change) => change.execute(&DdlContext::new(self.db, dialect)).await?,
            Change::Data(change) => {
                let ctx = DataContext::new(self.db, dialect, self.batch_size, self.clock);
                change.execute(&ctx).await?
            }
        }
        MigrationHistory::new(self.db)
            .record_applied(step.id(), self.clock.now_millis())
            .await?;

        log::info!(
            "#{} '{}': success | time={}ms",
            step.id(),
            step.description(),
            elapsed_ms(started)
        );
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
