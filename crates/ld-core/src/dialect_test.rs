use super::*;

#[test]
fn test_ids_round_trip() {
    for dialect in Dialect::ALL {
        assert_eq!(Dialect::from_id(dialect.id()).unwrap(), dialect);
    }
}

#[test]
fn test_from_id_is_case_insensitive() {
    assert_eq!(Dialect::from_id("PostgreSQL").unwrap(), Dialect::PostgreSql);
    assert_eq!(Dialect::from_id("MSSQL").unwrap(), Dialect::MsSql);
}

#[test]
fn test_unknown_dialect() {
    let err = Dialect::from_id("unknown-db-vendor").unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedDialect { ref id } if id == "unknown-db-vendor"));
    assert!(err.to_string().contains("[E003]"));
}

#[test]
fn test_from_str() {
    let dialect: Dialect = "oracle".parse().unwrap();
    assert_eq!(dialect, Dialect::Oracle);
    assert!("sybase".parse::<Dialect>().is_err());
}

#[test]
fn test_display() {
    assert_eq!(Dialect::H2.to_string(), "h2");
    assert_eq!(Dialect::DuckDb.to_string(), "duckdb");
}

#[test]
fn test_serde_ids() {
    let dialect: Dialect = serde_yaml::from_str("postgresql").unwrap();
    assert_eq!(dialect, Dialect::PostgreSql);
    let dialect: Dialect = serde_yaml::from_str("mssql").unwrap();
    assert_eq!(dialect, Dialect::MsSql);
}

