//! Reusable DDL changes
//!
//! Each change looks at the live schema first and does nothing when its work
//! is already done, so a step interrupted before its history record was
//! written can safely run again.

use crate::context::DdlContext;
use crate::error::MigrateResult;
use crate::step::DdlChange;
use async_trait::async_trait;
use ld_core::{ColumnName, IndexName, TableName};
use ld_sql::{
    ColumnDef, CreateIndexBuilder, CreateTableBuilder, DropColumnsBuilder, DropIndexBuilder,
};

/// Create a table unless it exists
#[derive(Debug, Clone)]
pub struct CreateTableChange {
    table: TableName,
    pk_columns: Vec<ColumnDef>,
    columns: Vec<ColumnDef>,
}

impl CreateTableChange {
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            pk_columns: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn pk_column(mut self, column: ColumnDef) -> Self {
        self.pk_columns.push(column);
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }
}

#[async_trait]
impl DdlChange for CreateTableChange {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()> {
        if ctx.table_exists(&self.table).await? {
            log::debug!("Table '{}' already exists", self.table);
            return Ok(());
        }
        let mut builder = CreateTableBuilder::new(ctx.dialect(), self.table.clone());
        for column in &self.pk_columns {
            builder = builder.add_pk_column(column.clone());
        }
        for column in &self.columns {
            builder = builder.add_column(column.clone());
        }
        ctx.execute_all(&builder.build()?).await
    }
}

/// Create an index unless one with the same name exists (ignoring case)
#[derive(Debug, Clone)]
pub struct CreateIndexChange {
    table: TableName,
    name: IndexName,
    columns: Vec<ColumnName>,
    unique: bool,
}

impl CreateIndexChange {
    pub fn new(table: TableName, name: IndexName) -> Self {
        Self {
            table,
            name,
            columns: Vec::new(),
            unique: false,
        }
    }

    pub fn column(mut self, column: ColumnName) -> Self {
        self.columns.push(column);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Statements to run, empty when the index is already there.
    pub async fn plan(&self, ctx: &DdlContext<'_>) -> MigrateResult<Vec<String>> {
        if ctx.index_exists(&self.table, &self.name).await? {
            log::debug!("Index '{}' already exists on '{}'", self.name, self.table);
            return Ok(Vec::new());
        }
        let mut builder = CreateIndexBuilder::new()
            .table(self.table.clone())
            .name(self.name.clone())
            .unique(self.unique);
        for column in &self.columns {
            builder = builder.add_column(column.clone());
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl DdlChange for CreateIndexChange {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()> {
        let statements = self.plan(ctx).await?;
        ctx.execute_all(&statements).await
    }
}

/// Drop an index if it exists
#[derive(Debug, Clone)]
pub struct DropIndexChange {
    table: TableName,
    name: IndexName,
}

impl DropIndexChange {
    pub fn new(table: TableName, name: IndexName) -> Self {
        Self { table, name }
    }
}

#[async_trait]
impl DdlChange for DropIndexChange {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()> {
        if !ctx.index_exists(&self.table, &self.name).await? {
            log::debug!("Index '{}' on '{}' already dropped", self.name, self.table);
            return Ok(());
        }
        let statements = DropIndexBuilder::new(ctx.dialect())
            .table(self.table.clone())
            .name(self.name.clone())
            .build()?;
        ctx.execute_all(&statements).await
    }
}

/// Drop the listed columns that still exist
#[derive(Debug, Clone)]
pub struct DropColumnChange {
    table: TableName,
    columns: Vec<ColumnName>,
}

impl DropColumnChange {
    pub fn new(table: TableName, columns: impl IntoIterator<Item = ColumnName>) -> Self {
        Self {
            table,
            columns: columns.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DdlChange for DropColumnChange {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()> {
        let mut remaining = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            if ctx.column_exists(&self.table, column).await? {
                remaining.push(column.clone());
            }
        }
        if remaining.is_empty() {
            log::debug!("Columns already dropped from '{}'", self.table);
            return Ok(());
        }
        let statements =
            DropColumnsBuilder::new(ctx.dialect(), self.table.clone(), remaining).build()?;
        ctx.execute_all(&statements).await
    }
}

#[cfg(test)]
#[path = "changes_test.rs"]
mod tests;
