//! Database schema definitions for the term index

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
-- One row per indexed page
CREATE TABLE IF NOT EXISTS pages (
    url TEXT PRIMARY KEY,
    block_count INTEGER NOT NULL,
    indexed_at TEXT NOT NULL
);

-- Occurrences of each term on each page
CREATE TABLE IF NOT EXISTS term_counts (
    url TEXT NOT NULL REFERENCES pages(url) ON DELETE CASCADE,
    term TEXT NOT NULL,
    count INTEGER NOT NULL,
    PRIMARY KEY (url, term)
);

CREATE INDEX IF NOT EXISTS idx_term_counts_term ON term_counts(term);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["pages", "term_counts"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
