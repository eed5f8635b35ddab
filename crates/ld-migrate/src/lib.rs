//! ld-migrate - Migration engine for Ladder
//!
//! Evolves a database schema and its data forward, one numbered step at a
//! time, exactly once per installation. The pieces, leaves first:
//!
//! - [`step`]: a step is either a DDL change or a data change
//! - [`registry`]: release providers ([`DbVersion`]) contribute contiguous
//!   step ids; [`MigrationStepRegistry::build`] freezes them
//! - [`history`]: the `schema_migrations` ledger of applied steps
//! - [`runner`]: executes the steps the ledger has not seen yet
//! - [`engine`]: composes everything for a host application

pub mod changes;
pub mod clock;
pub mod context;
pub mod drop_primary_key;
pub mod engine;
pub mod error;
pub mod history;
pub mod mass_update;
pub mod meddler;
pub mod pk_finder;
pub mod registry;
pub mod runner;
pub mod status;
pub mod step;
pub mod version;

#[cfg(test)]
pub(crate) mod test_utils;

pub use changes::{CreateIndexChange, CreateTableChange, DropColumnChange, DropIndexChange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{DataContext, DdlContext};
pub use drop_primary_key::DropPrimaryKeySqlGenerator;
pub use engine::MigrationEngine;
pub use error::{HistoryError, MigrateError, MigrateResult, RegistryError};
pub use history::{MigrationHistory, MigrationHistoryRecord};
pub use mass_update::{MassUpdate, MassUpdateStats};
pub use meddler::MigrationHistoryMeddler;
pub use pk_finder::DbPrimaryKeyConstraintFinder;
pub use registry::{DbVersion, MigrationStepRegistry, MigrationSteps};
pub use runner::{MigrationRunner, RunSummary, RunnerState};
pub use status::{MigrationStatus, StatusReport};
pub use step::{Change, DataChange, DdlChange, MigrationStep, StepId};
