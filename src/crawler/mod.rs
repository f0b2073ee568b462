//! Crawler module for breadth-first page indexing
//!
//! This module contains the core crawling logic, including:
//! - The `Crawler` state machine and its single-step operation
//! - Page fetching over HTTP or from saved fixtures
//! - Splitting pages into content blocks and extracting internal links
//! - The coordinator that drives steps until a stop condition

mod coordinator;
mod core;
mod fetcher;
mod links;
mod parser;

pub use self::core::{CrawlMode, Crawler, StepOutcome};
pub use coordinator::{build_crawler, Coordinator, CrawlSummary, StopCondition};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use links::SiteConfig;
pub use parser::{parse_content_blocks, ContentBlock};

use crate::config::Config;
use crate::index::Index;
use crate::CrawlError;

/// Options for a single crawl run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Fetch mode for every step
    pub mode: CrawlMode,

    /// When to stop stepping
    pub stop: StopCondition,

    /// Queue the source page's links before the first step
    pub prime: bool,
}

/// Runs a complete crawl over `index`
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the fetcher and crawler from the configuration
/// 2. Optionally prime the queue with the source page's links
/// 3. Step until the stop condition is met or the queue is empty
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `index` - The index pages are recorded in
/// * `options` - Mode, stop condition and priming
pub async fn crawl<I: Index>(
    config: &Config,
    index: I,
    options: RunOptions,
) -> Result<CrawlSummary, CrawlError> {
    let mut crawler = build_crawler(config, index)?;

    if options.prime {
        crawler.prime(options.mode).await?;
    }

    let mut coordinator = Coordinator::new(crawler, config.crawler.continue_on_error);
    coordinator.run(options.mode, options.stop).await
}
