//! Row-limited and counting wrappers around a select

use ld_core::Dialect;

fn trimmed(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// `SELECT COUNT(*)` over the rows `sql` selects.
pub fn count_rows(sql: &str) -> String {
    format!("SELECT COUNT(*) FROM ({}) counted", trimmed(sql))
}

/// `sql` restricted to at most `limit` rows, after skipping `offset`.
///
/// On MS SQL the select is wrapped in a derived table, so it must not carry
/// its own `ORDER BY`.
pub fn paged_select(dialect: Dialect, sql: &str, limit: usize, offset: usize) -> String {
    let sql = trimmed(sql);
    match (dialect, offset) {
        (Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb, 0) => {
            format!("{sql} LIMIT {limit}")
        }
        (Dialect::PostgreSql | Dialect::H2 | Dialect::DuckDb, _) => {
            format!("{sql} LIMIT {limit} OFFSET {offset}")
        }
        (Dialect::Oracle, 0) => format!("{sql} FETCH FIRST {limit} ROWS ONLY"),
        (Dialect::Oracle, _) => {
            format!("{sql} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
        }
        (Dialect::MsSql, 0) => format!("SELECT TOP {limit} * FROM ({sql}) page"),
        (Dialect::MsSql, _) => format!(
            "SELECT * FROM ({sql}) page ORDER BY (SELECT NULL) \
             OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
        ),
    }
}

#[cfg(test)]
#[path = "paging_test.rs"]
mod tests;
