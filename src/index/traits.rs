//! Index trait and error types
//!
//! The crawler only depends on the [`Index`] trait; [`super::SqliteIndex`] is the
//! persistent backend used by the binary.

use crate::crawler::ContentBlock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Errors that can occur during index operations
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to open index at {path}: {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },

    #[error("Index query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Failed to index {url}: {source}")]
    Write {
        url: String,
        source: rusqlite::Error,
    },

    #[error("Index unavailable: {0}")]
    Unavailable(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// A persistent store of indexed pages, keyed by URL
///
/// Methods take `&self` so one index can be shared by several crawlers; an
/// implementation shared that way is responsible for its own locking.
pub trait Index {
    /// Returns true if `url` has been recorded by a previous `index_page`
    fn is_indexed(&self, url: &Url) -> IndexResult<bool>;

    /// Records the term counts of `blocks` for `url`
    ///
    /// Re-indexing a URL replaces its previous records.
    fn index_page(&self, url: &Url, blocks: &[ContentBlock]) -> IndexResult<()>;

    /// Maps every indexed URL containing `term` to the number of occurrences
    fn get_counts(&self, term: &str) -> IndexResult<HashMap<String, u64>>;
}

impl<T: Index + ?Sized> Index for &T {
    fn is_indexed(&self, url: &Url) -> IndexResult<bool> {
        (**self).is_indexed(url)
    }

    fn index_page(&self, url: &Url, blocks: &[ContentBlock]) -> IndexResult<()> {
        (**self).index_page(url, blocks)
    }

    fn get_counts(&self, term: &str) -> IndexResult<HashMap<String, u64>> {
        (**self).get_counts(term)
    }
}

impl<T: Index + ?Sized> Index for Arc<T> {
    fn is_indexed(&self, url: &Url) -> IndexResult<bool> {
        (**self).is_indexed(url)
    }

    fn index_page(&self, url: &Url, blocks: &[ContentBlock]) -> IndexResult<()> {
        (**self).index_page(url, blocks)
    }

    fn get_counts(&self, term: &str) -> IndexResult<HashMap<String, u64>> {
        (**self).get_counts(term)
    }
}
