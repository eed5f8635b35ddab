//! Execution contexts handed to steps
//!
//! Both contexts are plain borrowed values built by the runner for each step.

use crate::clock::Clock;
use crate::drop_primary_key::DropPrimaryKeySqlGenerator;
use crate::error::{MigrateError, MigrateResult};
use crate::mass_update::MassUpdate;
use ld_core::Dialect;
use ld_db::{Database, DatabaseCore, DatabaseSchema, Row, SqlValue};

/// Resolve the dialect the database reports.
pub(crate) fn resolve_dialect(db: &dyn Database) -> MigrateResult<Dialect> {
    let id = db.db_type();
    Dialect::from_id(id).map_err(|_| MigrateError::UnsupportedDialect { id: id.to_string() })
}

/// Context for [`crate::DdlChange`] steps
#[derive(Clone, Copy)]
pub struct DdlContext<'a> {
    db: &'a dyn Database,
    dialect: Dialect,
}

impl<'a> DdlContext<'a> {
    pub fn new(db: &'a dyn Database, dialect: Dialect) -> Self {
        Self { db, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn db(&self) -> &'a dyn Database {
        self.db
    }

    pub async fn execute(&self, sql: &str) -> MigrateResult<()> {
        log::debug!("{sql}");
        self.db.execute(sql).await?;
        Ok(())
    }

    /// Execute a generated plan, statement by statement, in order.
    pub async fn execute_all(&self, statements: &[String]) -> MigrateResult<()> {
        for sql in statements {
            self.execute(sql).await?;
        }
        Ok(())
    }

    pub async fn table_exists(&self, table: &str) -> MigrateResult<bool> {
        Ok(self.db.table_exists(table).await?)
    }

    pub async fn column_exists(&self, table: &str, column: &str) -> MigrateResult<bool> {
        Ok(self.db.column_exists(table, column).await?)
    }

    /// Index lookup, ignoring case.
    pub async fn index_exists(&self, table: &str, index: &str) -> MigrateResult<bool> {
        Ok(self.db.index_exists(table, index).await?)
    }

    pub fn drop_primary_key_generator(&self) -> DropPrimaryKeySqlGenerator<'a> {
        DropPrimaryKeySqlGenerator::new(self.db)
    }
}

/// Context for [`crate::DataChange`] steps
#[derive(Clone, Copy)]
pub struct DataContext<'a> {
    db: &'a dyn Database,
    dialect: Dialect,
    batch_size: usize,
    clock: &'a dyn Clock,
}

impl<'a> DataContext<'a> {
    pub fn new(
        db: &'a dyn Database,
        dialect: Dialect,
        batch_size: usize,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            db,
            dialect,
            batch_size,
            clock,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn db(&self) -> &'a dyn Database {
        self.db
    }

    pub fn clock(&self) -> &'a dyn Clock {
        self.clock
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Start a batched select-then-update.
    pub fn prepare_mass_update(&self) -> MassUpdate<'a> {
        MassUpdate::new(self.db, self.dialect, self.batch_size)
    }

    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> MigrateResult<usize> {
        log::debug!("{sql}");
        Ok(self.db.execute_with_params(sql, params).await?)
    }

    pub async fn query_rows(&self, sql: &str, params: &[SqlValue]) -> MigrateResult<Vec<Row>> {
        Ok(self.db.query_rows(sql, params).await?)
    }

    pub async fn table_exists(&self, table: &str) -> MigrateResult<bool> {
        Ok(self.db.table_exists(table).await?)
    }

    pub async fn column_exists(&self, table: &str, column: &str) -> MigrateResult<bool> {
        Ok(self.db.column_exists(table, column).await?)
    }
}
