//! Wiki-Ripple: a breadth-first wiki crawler with a persistent term index
//!
//! This crate crawls a linked document collection starting from one seed page,
//! records every fetched page in a searchable SQLite index, and follows the
//! page's internal links in first-in-first-out order.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;

use thiserror::Error;

/// Main error type for Wiki-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while retrieving or parsing a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read fixture {path}: {source}")]
    Fixture {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid content selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Cannot fetch {0}: URL has no host")]
    UnsupportedUrl(String),
}

pub use index::IndexError;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ContentBlock, CrawlMode, Crawler, Fetcher, HttpFetcher, SiteConfig, StepOutcome};
pub use index::{Index, SqliteIndex};
