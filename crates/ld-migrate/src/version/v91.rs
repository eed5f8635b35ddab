//! Portfolio key index and removal of user-managed metrics (steps 6-10)

use crate::changes::{CreateIndexChange, DropColumnChange};
use crate::context::DataContext;
use crate::error::{MigrateError, MigrateResult};
use crate::registry::{DbVersion, MigrationStepRegistry};
use crate::step::{Change, DataChange};
use async_trait::async_trait;
use ld_core::{ColumnName, IndexName, TableName};
use ld_db::SqlValue;

pub struct DbVersion91;

impl DbVersion for DbVersion91 {
    fn add_steps(&self, registry: &mut MigrationStepRegistry) {
        registry
            .add(
                6,
                "Create unique index on 'portfolios.kee'",
                Change::ddl(
                    CreateIndexChange::new(
                        TableName::new("portfolios"),
                        IndexName::new("uniq_portfolios_kee"),
                    )
                    .column(ColumnName::new("kee"))
                    .unique(),
                ),
            )
            .add(
                7,
                "Drop custom metrics data from 'live_measures'",
                Change::data(DropCustomMetricsData::LiveMeasures),
            )
            .add(
                8,
                "Drop custom metrics data from 'project_measures'",
                Change::data(DropCustomMetricsData::ProjectMeasures),
            )
            .add(
                9,
                "Drop custom metrics data from 'metrics'",
                Change::data(DropCustomMetricsData::Metrics),
            )
            .add(
                10,
                "Drop 'user_managed' column from 'metrics'",
                Change::ddl(DropColumnChange::new(
                    TableName::new("metrics"),
                    [ColumnName::new(USER_MANAGED)],
                )),
            );
    }
}

const USER_MANAGED: &str = "user_managed";

/// Deletes rows belonging to user-managed metrics.
///
/// Guarded on `metrics.user_managed`: once step 10 dropped that column there
/// is nothing left to identify, and the step succeeds without touching data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCustomMetricsData {
    LiveMeasures,
    ProjectMeasures,
    Metrics,
}

impl DropCustomMetricsData {
    fn select_query(self) -> &'static str {
        match self {
            Self::LiveMeasures => {
                "SELECT lm.uuid FROM live_measures lm \
                 INNER JOIN metrics m ON m.uuid = lm.metric_uuid AND m.user_managed = ?"
            }
            Self::ProjectMeasures => {
                "SELECT pm.uuid FROM project_measures pm \
                 INNER JOIN metrics m ON m.uuid = pm.metric_uuid AND m.user_managed = ?"
            }
            Self::Metrics => "SELECT m.uuid FROM metrics m WHERE m.user_managed = ?",
        }
    }

    fn update_query(self) -> &'static str {
        match self {
            Self::LiveMeasures => "DELETE FROM live_measures WHERE uuid = ?",
            Self::ProjectMeasures => "DELETE FROM project_measures WHERE uuid = ?",
            Self::Metrics => "DELETE FROM metrics WHERE uuid = ?",
        }
    }
}

#[async_trait]
impl DataChange for DropCustomMetricsData {
    async fn execute(&self, ctx: &DataContext<'_>) -> MigrateResult<()> {
        if !ctx.column_exists("metrics", USER_MANAGED).await? {
            log::warn!(
                "Column 'metrics.{USER_MANAGED}' does not exist, no custom metrics data to drop"
            );
            return Ok(());
        }

        let stats = ctx
            .prepare_mass_update()
            .select(self.select_query(), vec![SqlValue::Bool(true)])
            .update(self.update_query())
            .execute(|row| {
                let uuid = row
                    .get_string(0)?
                    .ok_or_else(|| MigrateError::InvalidRow("null uuid".to_string()))?;
                Ok(Some(vec![SqlValue::Text(uuid)]))
            })
            .await?;
        log::info!("Dropped {} rows of custom metrics data", stats.rows_updated);
        Ok(())
    }
}

#[cfg(test)]
#[path = "v91_test.rs"]
mod tests;
