//! End-to-end runs of the release catalogue against DuckDB.

use ld_core::MigrationConfig;
use ld_db::{Database, DatabaseCore, DatabaseSchema, DuckDbBackend};
use ld_migrate::{FixedClock, MigrateError, MigrationEngine, MigrationStatus, StepId};
use std::sync::Arc;

fn engine(db: Arc<DuckDbBackend>) -> MigrationEngine {
    let db: Arc<dyn Database> = db;
    MigrationEngine::new(db, MigrationConfig::default())
        .unwrap()
        .with_clock(Arc::new(FixedClock(1_700_000_000_000)))
}

#[tokio::test]
async fn test_fresh_install_runs_every_step_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ladder.duckdb");

    {
        let db = Arc::new(DuckDbBackend::from_path(&path).unwrap());
        let engine = engine(db.clone());

        let status = engine.status().await.unwrap();
        assert_eq!(status.status, MigrationStatus::FreshInstall);
        assert_eq!(status.pending(), 10);
        assert_eq!(engine.pending().await.unwrap().len(), 10);

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.applied.len(), 10);
        assert_eq!(
            engine.status().await.unwrap().status,
            MigrationStatus::UpToDate
        );
    }

    // Reopen: the ledger persisted, so nothing is left to do
    let db = Arc::new(DuckDbBackend::from_path(&path).unwrap());
    let engine = engine(db.clone());
    let summary = engine.run().await.unwrap();
    assert!(summary.is_noop());
    assert!(engine.pending().await.unwrap().is_empty());

    let records = engine.records().await.unwrap();
    let ids: Vec<u32> = records.iter().map(|r| r.step_id.get()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    assert_eq!(
        records[0].applied_at_utc().unwrap().timestamp_millis(),
        1_700_000_000_000
    );

    let groups = db
        .query_rows("SELECT COUNT(*) FROM user_groups", &[])
        .await
        .unwrap();
    assert_eq!(groups[0].get_i64(0).unwrap(), Some(2));
}

#[tokio::test]
async fn test_upgrade_from_legacy_schema_version() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    // An installation at legacy version 9000 (steps 1-5) with custom metrics
    db.execute_batch(
        "CREATE TABLE schema_info (version BIGINT);
         INSERT INTO schema_info VALUES (9000);
         CREATE TABLE portfolios (uuid VARCHAR(40) PRIMARY KEY, kee VARCHAR(400) NOT NULL,
             name VARCHAR(2000) NOT NULL, created_at BIGINT NOT NULL);
         CREATE TABLE metrics (uuid VARCHAR(40) NOT NULL, name VARCHAR(64) NOT NULL,
             description VARCHAR(255), user_managed BOOLEAN);
         CREATE TABLE live_measures (uuid VARCHAR(40) PRIMARY KEY,
             component_uuid VARCHAR(50) NOT NULL, metric_uuid VARCHAR(40) NOT NULL,
             value DECIMAL(38,20));
         CREATE TABLE project_measures (uuid VARCHAR(40) PRIMARY KEY,
             analysis_uuid VARCHAR(50) NOT NULL, metric_uuid VARCHAR(40) NOT NULL,
             value DECIMAL(38,20));
         INSERT INTO metrics VALUES ('m1', 'ncloc', NULL, false), ('m2', 'team', NULL, true);
         INSERT INTO live_measures VALUES ('lm1', 'c1', 'm1', 1), ('lm2', 'c1', 'm2', 2);
         INSERT INTO project_measures VALUES ('pm1', 'a1', 'm2', 2);",
    )
    .await
    .unwrap();
    let engine = engine(db.clone());

    let status = engine.status().await.unwrap();
    assert_eq!(status.status, MigrationStatus::RequiresUpgrade);
    assert_eq!(status.last_applied, Some(StepId::new(5)));

    let summary = engine.run().await.unwrap();
    let applied: Vec<u32> = summary.applied.iter().map(|id| id.get()).collect();
    assert_eq!(applied, vec![6, 7, 8, 9, 10]);

    let metrics = db.query_rows("SELECT uuid FROM metrics", &[]).await.unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].get_string(0).unwrap().as_deref(), Some("m1"));
    let live = db
        .query_rows("SELECT COUNT(*) FROM live_measures", &[])
        .await
        .unwrap();
    assert_eq!(live[0].get_i64(0).unwrap(), Some(1));
    let project = db
        .query_rows("SELECT COUNT(*) FROM project_measures", &[])
        .await
        .unwrap();
    assert_eq!(project[0].get_i64(0).unwrap(), Some(0));
    assert!(!db.column_exists("metrics", "user_managed").await.unwrap());
    assert!(db
        .index_exists("portfolios", "uniq_portfolios_kee")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_legacy_version_too_old() {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    db.execute_batch(
        "CREATE TABLE schema_info (version BIGINT);
         INSERT INTO schema_info VALUES (8000);",
    )
    .await
    .unwrap();
    let engine = engine(db.clone());

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, MigrateError::History(_)), "got {err:?}");
    assert!(!db.table_exists("schema_migrations").await.unwrap());
}
