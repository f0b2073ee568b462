//! The crawl state machine
//!
//! A [`Crawler`] owns a FIFO queue of pending URLs. Each call to
//! [`Crawler::step`] takes one URL from the head, decides whether it needs
//! fetching, records the page in the index and appends the page's internal
//! links to the tail.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::{internal_links, SiteConfig};
use crate::crawler::parser::ContentBlock;
use crate::index::Index;
use crate::CrawlError;
use std::collections::VecDeque;
use url::Url;

/// Selects how a step fetches and whether it consults the index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlMode {
    /// Read saved pages and always re-index them
    Test,
    /// Fetch live pages, skipping any URL already in the index
    Normal,
}

/// What a single [`Crawler::step`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The URL was fetched, indexed and its links queued
    Done(Url),
    /// A URL was dequeued but was already indexed, so nothing was fetched
    Empty,
    /// The queue held nothing to process
    QueueExhausted,
}

/// Breadth-first crawler over a persistent index
pub struct Crawler<I, F> {
    source: Url,
    queue: VecDeque<Url>,
    index: I,
    fetcher: F,
    site: SiteConfig,
}

impl<I: Index, F: Fetcher> Crawler<I, F> {
    /// Creates a crawler whose queue holds only `source`
    ///
    /// Neither the index nor the fetcher is touched here.
    pub fn new(source: Url, index: I, fetcher: F, site: SiteConfig) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(source.clone());

        Self {
            source,
            queue,
            index,
            fetcher,
            site,
        }
    }

    /// The URL the crawl started from
    pub fn source(&self) -> &Url {
        &self.source
    }

    /// Number of URLs waiting to be processed
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Pending URLs, head first
    pub fn queued(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }

    /// The index this crawler writes to
    pub fn index(&self) -> &I {
        &self.index
    }

    /// The fetcher this crawler reads pages with
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Site settings used for link extraction
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Appends a URL to the tail of the queue
    ///
    /// A failed step does not put its URL back; callers that want a retry
    /// re-enqueue it here.
    pub fn enqueue(&mut self, url: Url) {
        self.queue.push_back(url);
    }

    /// Appends every internal link found in `blocks` to the queue
    ///
    /// Returns the number of URLs added.
    pub(crate) fn queue_internal_links(&mut self, blocks: &[ContentBlock]) -> usize {
        let links = internal_links(blocks, &self.site);
        let added = links.len();
        self.queue.extend(links);
        added
    }

    /// Fetches the source page and queues its links without indexing it
    ///
    /// Used to warm the queue before a crawl. Returns the number of URLs added.
    pub async fn prime(&mut self, mode: CrawlMode) -> Result<usize, CrawlError> {
        let blocks = self.fetcher.fetch(&self.source, mode).await?;
        let added = self.queue_internal_links(&blocks);
        tracing::debug!("Primed queue with {} links from {}", added, self.source);
        Ok(added)
    }

    /// Processes the URL at the head of the queue
    ///
    /// The URL is removed before any fetch or index call, so an error leaves
    /// it out of the queue. Links are queued only after the page has been
    /// written to the index.
    pub async fn step(&mut self, mode: CrawlMode) -> Result<StepOutcome, CrawlError> {
        let Some(url) = self.queue.pop_front() else {
            return Ok(StepOutcome::QueueExhausted);
        };

        if mode == CrawlMode::Normal && self.index.is_indexed(&url)? {
            tracing::debug!("Already indexed, skipping {}", url);
            return Ok(StepOutcome::Empty);
        }

        let blocks = self.fetcher.fetch(&url, mode).await?;
        self.index.index_page(&url, &blocks)?;
        let added = self.queue_internal_links(&blocks);

        tracing::info!(
            "Indexed {} ({} blocks, {} links queued, {} pending)",
            url,
            blocks.len(),
            added,
            self.queue.len()
        );

        Ok(StepOutcome::Done(url))
    }
}
