//! Redundant unique indexes dropped (steps 3-5)

use crate::changes::DropIndexChange;
use crate::registry::{DbVersion, MigrationStepRegistry};
use crate::step::Change;
use ld_core::{IndexName, TableName};

pub struct DbVersion90;

fn drop_index(table: &str, index: &str) -> Change {
    Change::ddl(DropIndexChange::new(
        TableName::new(table),
        IndexName::new(index),
    ))
}

impl DbVersion for DbVersion90 {
    fn add_steps(&self, registry: &mut MigrationStepRegistry) {
        registry
            .add(3, "Drop 'issues_kee' index", drop_index("issues", "issues_kee"))
            .add(
                4,
                "Drop 'ce_activity_uuid' index",
                drop_index("ce_activity", "ce_activity_uuid"),
            )
            .add(
                5,
                "Drop 'analyses_uuid' index",
                drop_index("snapshots", "analyses_uuid"),
            );
    }
}
