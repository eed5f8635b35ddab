use super::*;
use crate::error::MigrateError;
use crate::test_utils::InstrumentedDuckDb;
use ld_db::DuckDbBackend;
use ld_sql::SqlError;

async fn metrics_db(rows: usize) -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    seed_metrics(&db, rows).await;
    db
}

async fn seed_metrics(db: &dyn Database, rows: usize) {
    db.execute("CREATE TABLE metrics (uuid VARCHAR(40), name VARCHAR(64), user_managed BOOLEAN)")
        .await
        .unwrap();
    for i in 0..rows {
        db.execute_with_params(
            "INSERT INTO metrics VALUES (?, ?, ?)",
            &[
                format!("m{i}").into(),
                format!("metric_{i}").into(),
                (i % 2 == 0).into(),
            ],
        )
        .await
        .unwrap();
    }
}

async fn count(db: &dyn Database, sql: &str) -> i64 {
    let rows = db.query_rows(sql, &[]).await.unwrap();
    rows[0].get_i64(0).unwrap().unwrap()
}

fn delete_user_managed(db: &dyn Database, batch_size: usize) -> MassUpdate<'_> {
    MassUpdate::new(db, Dialect::DuckDb, batch_size)
        .select(
            "SELECT m.uuid FROM metrics m WHERE m.user_managed = ? ORDER BY m.uuid",
            vec![true.into()],
        )
        .update("DELETE FROM metrics WHERE uuid = ?")
}

fn uuid_param(row: &Row) -> MigrateResult<Option<Vec<SqlValue>>> {
    Ok(Some(vec![row.get(0)?.clone()]))
}

#[tokio::test]
async fn test_mass_update_applies_every_selected_row() {
    let db = metrics_db(6).await;

    let stats = delete_user_managed(&db, 250)
        .execute(uuid_param)
        .await
        .unwrap();

    assert_eq!(stats.rows_selected, 3);
    assert_eq!(stats.rows_updated, 3);
    assert_eq!(stats.rows_skipped, 0);
    assert_eq!(stats.batches, 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM metrics").await, 3);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM metrics WHERE user_managed").await,
        0
    );
}

#[tokio::test]
async fn test_mass_update_second_run_selects_nothing() {
    let db = metrics_db(4).await;
    delete_user_managed(&db, 250)
        .execute(uuid_param)
        .await
        .unwrap();

    let stats = delete_user_managed(&db, 250)
        .execute(uuid_param)
        .await
        .unwrap();
    assert_eq!(stats, MassUpdateStats::default());
}

#[tokio::test]
async fn test_mass_update_batches() {
    let db = metrics_db(10).await;

    let stats = delete_user_managed(&db, 2)
        .execute(uuid_param)
        .await
        .unwrap();

    assert_eq!(stats.rows_selected, 5);
    assert_eq!(stats.rows_updated, 5);
    assert_eq!(stats.batches, 3);
}

#[tokio::test]
async fn test_mass_update_handler_can_skip_rows() {
    let db = metrics_db(6).await;

    let stats = delete_user_managed(&db, 250)
        .execute(|row| {
            let uuid = row.get_string(0)?.unwrap_or_default();
            if uuid == "m0" {
                Ok(None)
            } else {
                Ok(Some(vec![uuid.into()]))
            }
        })
        .await
        .unwrap();

    assert_eq!(stats.rows_updated, 2);
    assert_eq!(stats.rows_skipped, 1);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM metrics WHERE uuid = 'm0'").await,
        1
    );
}

#[tokio::test]
async fn test_mass_update_failed_batch_is_rolled_back() {
    let db = metrics_db(8).await;
    let mut seen = 0;

    let err = delete_user_managed(&db, 2)
        .execute(|row| {
            seen += 1;
            if seen == 4 {
                return Err(MigrateError::InvalidRow("boom".to_string()));
            }
            uuid_param(row)
        })
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::InvalidRow(_)));
    // First batch (m0, m2) committed; second batch (m4 deleted, m6 failed) rolled back.
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM metrics WHERE user_managed").await,
        2
    );
}

#[tokio::test]
async fn test_mass_update_holds_one_batch_at_a_time() {
    let db = InstrumentedDuckDb::new();
    db.execute("CREATE TABLE metrics (uuid VARCHAR(40), name VARCHAR(64), user_managed BOOLEAN)")
        .await
        .unwrap();
    db.execute(
        "INSERT INTO metrics \
         SELECT 'm' || lpad(CAST(range AS VARCHAR), 4, '0'), 'metric_' || CAST(range AS VARCHAR), range % 2 = 0 \
         FROM range(2000)",
    )
    .await
    .unwrap();

    let stats = delete_user_managed(&db, 10)
        .execute(uuid_param)
        .await
        .unwrap();

    assert_eq!(stats.rows_selected, 1000);
    assert_eq!(stats.rows_updated, 1000);
    assert_eq!(stats.batches, 100);
    assert!(db.max_rows() <= 10, "held {} rows at once", db.max_rows());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM metrics").await, 1000);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM metrics WHERE user_managed").await,
        0
    );
}

#[tokio::test]
async fn test_mass_update_pages_past_skipped_rows() {
    let db = InstrumentedDuckDb::new();
    seed_metrics(&db, 20).await;

    let stats = delete_user_managed(&db, 3)
        .execute(|row| {
            let uuid = row.get_string(0)?.unwrap_or_default();
            if uuid == "m0" || uuid == "m14" {
                Ok(None)
            } else {
                Ok(Some(vec![uuid.into()]))
            }
        })
        .await
        .unwrap();

    assert_eq!(stats.rows_selected, 10);
    assert_eq!(stats.rows_updated, 8);
    assert_eq!(stats.rows_skipped, 2);
    assert!(db.max_rows() <= 3);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM metrics WHERE user_managed").await,
        2
    );
}

#[tokio::test]
async fn test_mass_update_rejects_non_select_query() {
    let db = metrics_db(2).await;

    let err = MassUpdate::new(&db, Dialect::DuckDb, 10)
        .select("DELETE FROM metrics", vec![])
        .update("DELETE FROM metrics WHERE uuid = ?")
        .execute(uuid_param)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MigrateError::Sql(SqlError::UnsupportedStatement(_))
    ));
    assert_eq!(count(&db, "SELECT COUNT(*) FROM metrics").await, 2);
}

#[tokio::test]
async fn test_mass_update_requires_update_statement() {
    let db = metrics_db(1).await;

    let err = MassUpdate::new(&db, Dialect::DuckDb, 10)
        .select("SELECT uuid FROM metrics", vec![])
        .execute(uuid_param)
        .await
        .unwrap_err();

    assert!(matches!(err, MigrateError::Sql(SqlError::ValidationError(_))));
}
