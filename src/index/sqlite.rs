//! SQLite index implementation
//!
//! This module provides a SQLite-based implementation of the Index trait.

use crate::crawler::ContentBlock;
use crate::index::schema::initialize_schema;
use crate::index::terms::count_terms;
use crate::index::traits::{Index, IndexError, IndexResult};
use crate::index::IndexStats;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// SQLite index backend
///
/// The connection sits behind a mutex, so an `Arc<SqliteIndex>` can be handed
/// to several crawlers. Each `index_page` runs in a single transaction.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
}

impl SqliteIndex {
    /// Opens or creates an index database at `path`
    pub fn open(path: &Path) -> IndexResult<Self> {
        let open_err = |source| IndexError::Open {
            path: path.display().to_string(),
            source,
        };

        let conn = Connection::open(path).map_err(open_err)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(open_err)?;

        initialize_schema(&conn).map_err(open_err)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory index that disappears when dropped
    pub fn open_in_memory() -> IndexResult<Self> {
        let open_err = |source| IndexError::Open {
            path: ":memory:".to_string(),
            source,
        };

        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(open_err)?;
        initialize_schema(&conn).map_err(open_err)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Removes every indexed page and term count
    pub fn clear(&self) -> IndexResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("DELETE FROM term_counts; DELETE FROM pages;")
            .map_err(IndexError::Query)?;
        Ok(())
    }

    /// Summarises the index contents
    pub fn stats(&self) -> IndexResult<IndexStats> {
        let conn = self.lock()?;

        let pages: i64 = conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
            .map_err(IndexError::Query)?;
        let distinct_terms: i64 = conn
            .query_row("SELECT COUNT(DISTINCT term) FROM term_counts", [], |row| {
                row.get(0)
            })
            .map_err(IndexError::Query)?;
        let last_indexed_at: Option<String> = conn
            .query_row("SELECT MAX(indexed_at) FROM pages", [], |row| row.get(0))
            .map_err(IndexError::Query)?;

        Ok(IndexStats {
            pages: pages as u64,
            distinct_terms: distinct_terms as u64,
            last_indexed_at,
        })
    }

    fn lock(&self) -> IndexResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| IndexError::Unavailable("connection mutex poisoned".to_string()))
    }
}

impl Index for SqliteIndex {
    fn is_indexed(&self, url: &Url) -> IndexResult<bool> {
        let conn = self.lock()?;
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM pages WHERE url = ?1)",
                params![url.as_str()],
                |row| row.get(0),
            )
            .map_err(IndexError::Query)?;
        Ok(exists)
    }

    fn index_page(&self, url: &Url, blocks: &[ContentBlock]) -> IndexResult<()> {
        let write_err = |source| IndexError::Write {
            url: url.to_string(),
            source,
        };

        let counts = count_terms(blocks.iter().map(|block| block.text.as_str()));
        let now = Utc::now().to_rfc3339();

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(write_err)?;

        tx.execute(
            "INSERT INTO pages (url, block_count, indexed_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(url) DO UPDATE SET block_count = excluded.block_count,
                                            indexed_at = excluded.indexed_at",
            params![url.as_str(), blocks.len() as i64, now],
        )
        .map_err(write_err)?;

        tx.execute(
            "DELETE FROM term_counts WHERE url = ?1",
            params![url.as_str()],
        )
        .map_err(write_err)?;

        {
            let mut stmt = tx
                .prepare("INSERT INTO term_counts (url, term, count) VALUES (?1, ?2, ?3)")
                .map_err(write_err)?;
            for (term, count) in &counts {
                stmt.execute(params![url.as_str(), term, *count as i64])
                    .map_err(write_err)?;
            }
        }

        tx.commit().map_err(write_err)?;

        tracing::debug!("Indexed {} ({} distinct terms)", url, counts.len());
        Ok(())
    }

    fn get_counts(&self, term: &str) -> IndexResult<HashMap<String, u64>> {
        let term = term.to_lowercase();
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT url, count FROM term_counts WHERE term = ?1")
            .map_err(IndexError::Query)?;

        let counts = stmt
            .query_map(params![term], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })
            .map_err(IndexError::Query)?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(IndexError::Query)?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn blocks(texts: &[&str]) -> Vec<ContentBlock> {
        texts
            .iter()
            .map(|t| ContentBlock::from_html(&format!("<p>{}</p>", t)))
            .collect()
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteIndex::open_in_memory().is_ok());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        let page = url("https://en.wikipedia.org/wiki/Java");

        {
            let index = SqliteIndex::open(&path).unwrap();
            index.index_page(&page, &blocks(&["persisted"])).unwrap();
        }

        let reopened = SqliteIndex::open(&path).unwrap();
        assert!(reopened.is_indexed(&page).unwrap());
    }

    #[test]
    fn test_is_indexed_after_index_page() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let page = url("https://en.wikipedia.org/wiki/Java");

        assert!(!index.is_indexed(&page).unwrap());
        index.index_page(&page, &blocks(&["Java is a language"])).unwrap();
        assert!(index.is_indexed(&page).unwrap());
    }

    #[test]
    fn test_empty_page_is_still_indexed() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let page = url("https://en.wikipedia.org/wiki/Empty");

        index.index_page(&page, &[]).unwrap();

        assert!(index.is_indexed(&page).unwrap());
        assert_eq!(index.stats().unwrap().pages, 1);
    }

    #[test]
    fn test_get_counts() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let java = url("https://en.wikipedia.org/wiki/Java");
        let python = url("https://en.wikipedia.org/wiki/Python");

        index
            .index_page(&java, &blocks(&["The Java language.", "The JVM runs the code."]))
            .unwrap();
        index
            .index_page(&python, &blocks(&["Python is the language"]))
            .unwrap();

        let counts = index.get_counts("the").unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[java.as_str()], 3);
        assert_eq!(counts[python.as_str()], 1);

        let counts = index.get_counts("JVM").unwrap();
        assert_eq!(counts.len(), 1);

        assert!(index.get_counts("missing").unwrap().is_empty());
    }

    #[test]
    fn test_reindex_replaces_previous_counts() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let page = url("https://en.wikipedia.org/wiki/Java");

        index.index_page(&page, &blocks(&["old old words"])).unwrap();
        index.index_page(&page, &blocks(&["new words"])).unwrap();

        assert!(index.get_counts("old").unwrap().is_empty());
        assert_eq!(index.get_counts("words").unwrap()[page.as_str()], 1);
        assert_eq!(index.stats().unwrap().pages, 1);
    }

    #[test]
    fn test_reindex_same_content_is_idempotent() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let page = url("https://en.wikipedia.org/wiki/Java");
        let content = blocks(&["the same the same"]);

        index.index_page(&page, &content).unwrap();
        let first = index.get_counts("the").unwrap();
        index.index_page(&page, &content).unwrap();
        let second = index.get_counts("the").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_clear() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let page = url("https://en.wikipedia.org/wiki/Java");
        index.index_page(&page, &blocks(&["text"])).unwrap();

        index.clear().unwrap();

        assert!(!index.is_indexed(&page).unwrap());
        assert_eq!(index.stats().unwrap().distinct_terms, 0);
    }

    #[test]
    fn test_stats() {
        let index = SqliteIndex::open_in_memory().unwrap();
        let empty = index.stats().unwrap();
        assert_eq!(empty.pages, 0);
        assert_eq!(empty.last_indexed_at, None);

        index
            .index_page(&url("https://en.wikipedia.org/wiki/A"), &blocks(&["a b"]))
            .unwrap();
        index
            .index_page(&url("https://en.wikipedia.org/wiki/B"), &blocks(&["b c"]))
            .unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.distinct_terms, 3);
        assert!(stats.last_indexed_at.is_some());
    }

    #[test]
    fn test_shared_through_arc() {
        let index = Arc::new(SqliteIndex::open_in_memory().unwrap());
        let other = Arc::clone(&index);
        let page = url("https://en.wikipedia.org/wiki/Shared");

        Index::index_page(&index, &page, &blocks(&["shared"])).unwrap();

        assert!(Index::is_indexed(&other, &page).unwrap());
    }
}
