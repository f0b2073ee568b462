//! Persistent term index
//!
//! This module handles everything the crawler records about fetched pages:
//! - The `Index` trait the crawler is written against
//! - SQLite schema and the `SqliteIndex` backend
//! - Term counting for page text

mod schema;
mod sqlite;
mod terms;
mod traits;

pub use sqlite::SqliteIndex;
pub use terms::{count_terms, tokenize};
pub use traits::{Index, IndexError, IndexResult};

/// Summary of an index's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of indexed pages
    pub pages: u64,

    /// Number of distinct terms across all pages
    pub distinct_terms: u64,

    /// RFC 3339 timestamp of the most recent write, if any
    pub last_indexed_at: Option<String>,
}
