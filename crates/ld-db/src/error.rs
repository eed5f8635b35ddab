//! Error types for ld-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {message} (SQL: {sql})")]
    ExecutionError { message: String, sql: String },

    /// Transaction control error (D003)
    #[error("[D003] Transaction {action} failed: {message}")]
    TransactionError { action: String, message: String },

    /// Column value could not be read as the requested type (D004)
    #[error("[D004] Column {index}: {message}")]
    ValueError { index: usize, message: String },

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Backend left out of this build (D006)
    #[error("[D006] Database backend '{backend}' is not compiled in (enable the '{feature}' feature)")]
    NotCompiled {
        backend: &'static str,
        feature: &'static str,
    },
}

impl DbError {
    /// Build an [`DbError::ExecutionError`] carrying the failing SQL.
    pub fn execution(message: impl ToString, sql: &str) -> Self {
        DbError::ExecutionError {
            message: message.to_string(),
            sql: sql.to_string(),
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
