use super::*;

fn parser() -> SqlParser {
    SqlParser::duckdb()
}

#[test]
fn test_validate_select() {
    assert!(validate_select(&parser(), "SELECT uuid FROM metrics").is_ok());
}

#[test]
fn test_validate_select_with_join_and_placeholder() {
    let sql = "SELECT lm.uuid FROM live_measures lm \
               INNER JOIN metrics m ON m.uuid = lm.metric_uuid AND m.user_managed = ?";
    assert!(validate_select(&parser(), sql).is_ok());
}

#[test]
fn test_validate_select_rejects_delete() {
    let err = validate_select(&parser(), "DELETE FROM metrics").unwrap_err();
    match err {
        SqlError::UnsupportedStatement(msg) => assert!(msg.contains("DELETE"), "{msg}"),
        other => panic!("expected UnsupportedStatement, got {other:?}"),
    }
}

#[test]
fn test_validate_select_rejects_empty() {
    assert!(matches!(
        validate_select(&parser(), " "),
        Err(SqlError::EmptySql)
    ));
}

#[test]
fn test_validate_data_modification_accepts_dml() {
    let parser = parser();
    assert!(validate_data_modification(&parser, "DELETE FROM metrics WHERE uuid = ?").is_ok());
    assert!(validate_data_modification(&parser, "UPDATE metrics SET name = ? WHERE uuid = ?").is_ok());
    assert!(validate_data_modification(&parser, "INSERT INTO metrics (uuid) VALUES (?)").is_ok());
}

#[test]
fn test_validate_data_modification_rejects_select_and_ddl() {
    let parser = parser();
    assert!(matches!(
        validate_data_modification(&parser, "SELECT 1"),
        Err(SqlError::UnsupportedStatement(_))
    ));
    assert!(matches!(
        validate_data_modification(&parser, "DROP TABLE metrics"),
        Err(SqlError::UnsupportedStatement(_))
    ));
}

#[test]
fn test_validate_rejects_multiple_statements() {
    assert!(validate_data_modification(
        &parser(),
        "DELETE FROM a WHERE uuid = ?; DELETE FROM b WHERE uuid = ?"
    )
    .is_err());
}
