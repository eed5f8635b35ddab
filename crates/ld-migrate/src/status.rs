//! Where an installation stands relative to the step catalogue

use crate::step::StepId;
use serde::Serialize;
use std::fmt;

/// Migration status of a database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    /// No step applied yet
    FreshInstall,
    UpToDate,
    RequiresUpgrade,
    /// The ledger is ahead of this build
    RequiresDowngrade,
}

impl MigrationStatus {
    /// Compare the last applied step with the latest known one.
    pub fn compute(last_applied: Option<StepId>, latest: StepId) -> Self {
        match last_applied {
            None => MigrationStatus::FreshInstall,
            Some(last) if last == latest => MigrationStatus::UpToDate,
            Some(last) if last < latest => MigrationStatus::RequiresUpgrade,
            Some(_) => MigrationStatus::RequiresDowngrade,
        }
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MigrationStatus::FreshInstall => "fresh install",
            MigrationStatus::UpToDate => "up to date",
            MigrationStatus::RequiresUpgrade => "requires upgrade",
            MigrationStatus::RequiresDowngrade => "requires downgrade",
        };
        f.write_str(s)
    }
}

/// Status plus the step ids it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: MigrationStatus,
    pub last_applied: Option<StepId>,
    pub latest: StepId,
}

impl StatusReport {
    pub fn new(last_applied: Option<StepId>, latest: StepId) -> Self {
        Self {
            status: MigrationStatus::compute(last_applied, latest),
            last_applied,
            latest,
        }
    }

    /// Steps still to run, zero unless an upgrade is required
    pub fn pending(&self) -> u32 {
        match self.status {
            MigrationStatus::FreshInstall => self.latest.get(),
            MigrationStatus::RequiresUpgrade => {
                self.latest.get() - self.last_applied.map_or(0, StepId::get)
            }
            MigrationStatus::UpToDate | MigrationStatus::RequiresDowngrade => 0,
        }
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
