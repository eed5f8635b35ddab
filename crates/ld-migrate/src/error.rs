//! Error types for ld-migrate

use crate::step::StepId;
use ld_db::DbError;
use ld_sql::SqlError;
use thiserror::Error;

/// Malformed step catalogue, detected when the registry is built
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// R001: Nothing registered
    #[error("[R001] No migration step registered")]
    Empty,

    /// R002: Two steps share an id
    #[error("[R002] Migration step {id} is registered more than once")]
    Duplicate { id: StepId },

    /// R003: Ids are not contiguous
    #[error("[R003] Migration steps are not contiguous: {previous} is followed by {next}")]
    Gap { previous: StepId, next: StepId },

    /// R004: Lowest id is not the first id of a fresh installation
    #[error("[R004] First migration step must be {expected}, found {found}")]
    WrongStart { expected: StepId, found: StepId },
}

/// Corrupted or unexpected migration history
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    /// H001: Recording a step that does not directly follow the last one
    #[error("[H001] Cannot record step {got} as applied: expected {expected}")]
    OutOfOrder { expected: StepId, got: StepId },

    /// H002: Ledger table absent when a record is written
    #[error("[H002] Migration history table '{table}' does not exist")]
    TableMissing { table: String },

    /// H003: Legacy marker predates the oldest upgradable version
    #[error("[H003] Legacy schema version {version} is too old to upgrade (oldest supported: {oldest})")]
    UnsupportedLegacyVersion { version: i64, oldest: i64 },

    /// H004: Last recorded step is the highest representable id
    #[error("[H004] Migration history is corrupted: no step can follow {last}")]
    StepIdOverflow { last: StepId },
}

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Registry error propagation
    #[error("[M001] Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// M002: History error propagation
    #[error("[M002] History error: {0}")]
    History(#[from] HistoryError),

    /// M003: Database error propagation
    #[error("[M003] Database error: {0}")]
    Db(#[from] DbError),

    /// M004: SQL generation or validation error propagation
    #[error("[M004] SQL error: {0}")]
    Sql(#[from] SqlError),

    /// M005: The database reports a dialect no generator handles
    #[error("[M005] Unsupported database dialect: '{id}'")]
    UnsupportedDialect { id: String },

    /// M006: Primary key constraint lookup came back empty
    #[error("[M006] No primary key constraint found on table '{table}'")]
    ConstraintNotFound { table: String },

    /// M007: The ledger knows steps this build does not
    #[error("[M007] Database is at step {applied} but this version only knows up to step {latest}; downgrade is not supported")]
    RequiresDowngrade { applied: StepId, latest: StepId },

    /// M008: A step's execution failed; carries the step identity
    #[error("[M008] Migration step {id} ({description}) failed: {source}")]
    StepFailed {
        id: StepId,
        description: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// M009: A selected row could not be transformed
    #[error("[M009] Invalid row in mass update: {0}")]
    InvalidRow(String),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
