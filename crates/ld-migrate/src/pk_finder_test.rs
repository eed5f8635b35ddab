use super::*;
use crate::error::MigrateError;
use crate::test_utils::FakeDatabase;
use ld_db::{DatabaseCore, DuckDbBackend};

#[test]
fn test_constraint_query_case_per_dialect() {
    assert_eq!(constraint_query(Dialect::Oracle, "issues").1, "ISSUES");
    assert_eq!(constraint_query(Dialect::H2, "issues").1, "ISSUES");
    assert_eq!(constraint_query(Dialect::PostgreSql, "Issues").1, "issues");
    assert_eq!(constraint_query(Dialect::MsSql, "Issues").1, "Issues");
    assert!(constraint_query(Dialect::MsSql, "issues")
        .0
        .contains("sys.key_constraints"));
}

#[tokio::test]
async fn test_find_constraint_name_postgres() {
    let db = FakeDatabase::new("postgresql")
        .with_rows("pg_constraint", vec![vec!["pk_issues".into()]]);
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert_eq!(
        finder.find_constraint_name("issues").await.unwrap(),
        Some("pk_issues".to_string())
    );
}

#[tokio::test]
async fn test_find_constraint_name_missing() {
    let db = FakeDatabase::new("oracle");
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert_eq!(finder.find_constraint_name("issues").await.unwrap(), None);
}

#[tokio::test]
async fn test_postgres_sequence() {
    let db = FakeDatabase::new("postgresql").with_rows(
        "pg_get_serial_sequence",
        vec![vec!["public.issues_id_seq".into()]],
    );
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert_eq!(
        finder.postgres_sequence("issues", "id").await.unwrap(),
        Some("public.issues_id_seq".to_string())
    );
}

#[tokio::test]
async fn test_postgres_sequence_null() {
    let db = FakeDatabase::new("postgresql")
        .with_rows("pg_get_serial_sequence", vec![vec![SqlValue::Null]]);
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert_eq!(finder.postgres_sequence("issues", "id").await.unwrap(), None);
}

#[tokio::test]
async fn test_postgres_sequence_only_on_postgres() {
    let db = FakeDatabase::new("mssql").with_rows(
        "pg_get_serial_sequence",
        vec![vec!["issues_id_seq".into()]],
    );
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert_eq!(finder.postgres_sequence("issues", "id").await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_dialect() {
    let db = FakeDatabase::new("unknown-db-vendor");
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    let err = finder.find_constraint_name("issues").await.unwrap_err();
    assert!(matches!(err, MigrateError::UnsupportedDialect { ref id } if id == "unknown-db-vendor"));
}

#[tokio::test]
async fn test_find_constraint_name_duckdb() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE issues (kee VARCHAR PRIMARY KEY, message VARCHAR)")
        .await
        .unwrap();
    db.execute("CREATE TABLE no_pk (kee VARCHAR)").await.unwrap();
    let finder = DbPrimaryKeyConstraintFinder::new(&db);

    assert!(finder.find_constraint_name("ISSUES").await.unwrap().is_some());
    assert_eq!(finder.find_constraint_name("no_pk").await.unwrap(), None);
}
