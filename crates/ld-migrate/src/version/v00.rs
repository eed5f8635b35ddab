//! Initial schema and data (steps 1-2)

use crate::changes::{CreateIndexChange, CreateTableChange};
use crate::context::{DataContext, DdlContext};
use crate::error::MigrateResult;
use crate::history::{create_history_table, HISTORY_TABLE};
use crate::registry::{DbVersion, MigrationStepRegistry};
use crate::step::{Change, DataChange, DdlChange};
use async_trait::async_trait;
use ld_core::{ColumnName, IndexName, TableName};
use ld_db::SqlValue;
use ld_sql::{ColumnDef, ColumnType};
use uuid::Uuid;

pub struct DbVersion00;

impl DbVersion for DbVersion00 {
    fn add_steps(&self, registry: &mut MigrationStepRegistry) {
        registry
            .add(1, "Create initial schema", Change::ddl(CreateInitialSchema))
            .add(2, "Populate initial schema", Change::data(PopulateInitialSchema));
    }
}

fn col(name: &str, column_type: ColumnType) -> ColumnDef {
    ColumnDef::new(ColumnName::new(name), column_type)
}

fn uuid_pk(table: &str) -> CreateTableChange {
    CreateTableChange::new(TableName::new(table)).pk_column(col("uuid", ColumnType::Varchar(40)))
}

fn tables() -> Vec<CreateTableChange> {
    vec![
        CreateTableChange::new(TableName::new("internal_properties"))
            .pk_column(col("kee", ColumnType::Varchar(20)))
            .column(col("is_empty", ColumnType::Boolean).not_null())
            .column(col("text_value", ColumnType::Varchar(4000)))
            .column(col("clob_value", ColumnType::Clob))
            .column(col("created_at", ColumnType::BigInt).not_null()),
        uuid_pk("user_groups")
            .column(col("name", ColumnType::Varchar(500)).not_null())
            .column(col("description", ColumnType::Varchar(200)))
            .column(col("created_at", ColumnType::BigInt).not_null())
            .column(col("updated_at", ColumnType::BigInt).not_null()),
        CreateTableChange::new(TableName::new("issues"))
            .pk_column(col("kee", ColumnType::Varchar(50)))
            .column(col("rule_uuid", ColumnType::Varchar(40)))
            .column(col("component_uuid", ColumnType::Varchar(50)))
            .column(col("message", ColumnType::Varchar(4000)))
            .column(col("created_at", ColumnType::BigInt)),
        uuid_pk("ce_activity")
            .column(col("task_type", ColumnType::Varchar(40)).not_null())
            .column(col("status", ColumnType::Varchar(15)).not_null())
            .column(col("created_at", ColumnType::BigInt).not_null()),
        uuid_pk("snapshots")
            .column(col("component_uuid", ColumnType::Varchar(50)).not_null())
            .column(col("created_at", ColumnType::BigInt).not_null()),
        uuid_pk("portfolios")
            .column(col("kee", ColumnType::Varchar(400)).not_null())
            .column(col("name", ColumnType::Varchar(2000)).not_null())
            .column(col("created_at", ColumnType::BigInt).not_null()),
        // No primary key: the column drop of step 10 must work on every backend.
        CreateTableChange::new(TableName::new("metrics"))
            .column(col("uuid", ColumnType::Varchar(40)).not_null())
            .column(col("name", ColumnType::Varchar(64)).not_null())
            .column(col("description", ColumnType::Varchar(255)))
            .column(col("user_managed", ColumnType::Boolean)),
        uuid_pk("live_measures")
            .column(col("component_uuid", ColumnType::Varchar(50)).not_null())
            .column(col("metric_uuid", ColumnType::Varchar(40)).not_null())
            .column(col("value", ColumnType::Decimal)),
        uuid_pk("project_measures")
            .column(col("analysis_uuid", ColumnType::Varchar(50)).not_null())
            .column(col("metric_uuid", ColumnType::Varchar(40)).not_null())
            .column(col("value", ColumnType::Decimal)),
    ]
}

fn unique_index(table: &str, name: &str, column: &str) -> CreateIndexChange {
    CreateIndexChange::new(TableName::new(table), IndexName::new(name))
        .column(ColumnName::new(column))
        .unique()
}

fn indexes() -> Vec<CreateIndexChange> {
    vec![
        unique_index("issues", "issues_kee", "kee"),
        unique_index("ce_activity", "ce_activity_uuid", "uuid"),
        unique_index("snapshots", "analyses_uuid", "uuid"),
    ]
}

/// Step 1: every table of a fresh installation, the ledger included
pub struct CreateInitialSchema;

#[async_trait]
impl DdlChange for CreateInitialSchema {
    async fn execute(&self, ctx: &DdlContext<'_>) -> MigrateResult<()> {
        if !ctx.table_exists(HISTORY_TABLE).await? {
            ctx.execute_all(&create_history_table(ctx.dialect())?).await?;
        }
        for table in tables() {
            table.execute(ctx).await?;
        }
        for index in indexes() {
            index.execute(ctx).await?;
        }
        Ok(())
    }
}

/// Step 2: installation properties and default groups
pub struct PopulateInitialSchema;

const DEFAULT_GROUPS: &[(&str, &str)] = &[
    (
        "ladder-users",
        "Any new users created will automatically join this group",
    ),
    ("ladder-administrators", "System administrators"),
];

impl PopulateInitialSchema {
    async fn count(ctx: &DataContext<'_>, sql: &str, key: &str) -> MigrateResult<i64> {
        let rows = ctx.query_rows(sql, &[key.into()]).await?;
        match rows.first() {
            Some(row) => Ok(row.get_i64(0)?.unwrap_or_default()),
            None => Ok(0),
        }
    }

    async fn insert_internal_property(
        ctx: &DataContext<'_>,
        key: &str,
        value: &str,
        now: i64,
    ) -> MigrateResult<()> {
        let existing = Self::count(
            ctx,
            "SELECT COUNT(*) FROM internal_properties WHERE kee = ?",
            key,
        )
        .await?;
        if existing > 0 {
            return Ok(());
        }
        ctx.execute(
            "INSERT INTO internal_properties (kee, is_empty, text_value, created_at) \
             VALUES (?, ?, ?, ?)",
            &[key.into(), false.into(), value.into(), now.into()],
        )
        .await?;
        Ok(())
    }

    async fn insert_group(
        ctx: &DataContext<'_>,
        name: &str,
        description: &str,
        now: i64,
    ) -> MigrateResult<()> {
        let existing =
            Self::count(ctx, "SELECT COUNT(*) FROM user_groups WHERE name = ?", name).await?;
        if existing > 0 {
            return Ok(());
        }
        ctx.execute(
            "INSERT INTO user_groups (uuid, name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
            &[
                SqlValue::Text(Uuid::new_v4().to_string()),
                name.into(),
                description.into(),
                now.into(),
                now.into(),
            ],
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DataChange for PopulateInitialSchema {
    async fn execute(&self, ctx: &DataContext<'_>) -> MigrateResult<()> {
        let now = ctx.clock().now_millis();
        Self::insert_internal_property(ctx, "installation.date", &now.to_string(), now).await?;
        Self::insert_internal_property(
            ctx,
            "installation.version",
            env!("CARGO_PKG_VERSION"),
            now,
        )
        .await?;
        for (name, description) in DEFAULT_GROUPS {
            Self::insert_group(ctx, name, description, now).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "v00_test.rs"]
mod tests;
