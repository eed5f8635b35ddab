//! Migration step model

use crate::context::{DataContext, DdlContext};
use crate::error::MigrateResult;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Identity of a migration step. Ids start at 1 and are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StepId(u32);

impl StepId {
    /// First step of a fresh installation
    pub const FIRST: StepId = StepId(1);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id directly following this one, or `None` past `u32::MAX`.
    pub fn next(self) -> Option<StepId> {
        self.0.checked_add(1).map(StepId)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schema-only change (tables, columns, indexes, constraints).
///
/// Implementations must tolerate running twice: check what exists before
/// acting.
#[async_trait]
pub trait DdlChange: Send + Sync {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()>;
}

/// A change to row contents, usually through [`crate::MassUpdate`].
#[async_trait]
pub trait DataChange: Send + Sync {
    async fn execute(&self, ctx: &DataContext<'_>) -> MigrateResult<()>;
}

/// What a step does
pub enum Change {
    Ddl(Box<dyn DdlChange>),
    Data(Box<dyn DataChange>),
}

impl Change {
    pub fn ddl(change: impl DdlChange + 'static) -> Self {
        Change::Ddl(Box::new(change))
    }

    pub fn data(change: impl DataChange + 'static) -> Self {
        Change::Data(Box::new(change))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Change::Ddl(_) => "ddl",
            Change::Data(_) => "data",
        }
    }
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Change::{}", self.kind())
    }
}

/// A numbered, forward-only unit of migration
#[derive(Debug)]
pub struct MigrationStep {
    id: StepId,
    description: String,
    change: Change,
}

impl MigrationStep {
    pub fn new(id: StepId, description: impl Into<String>, change: Change) -> Self {
        Self {
            id,
            description: description.into(),
            change,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn change(&self) -> &Change {
        &self.change
    }
}
