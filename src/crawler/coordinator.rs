//! Crawler coordinator - drives the crawl loop
//!
//! The coordinator calls [`Crawler::step`] until a stop condition is met or
//! the queue runs dry, and decides what to do when a step fails.

use crate::config::Config;
use crate::crawler::core::{CrawlMode, Crawler, StepOutcome};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::links::SiteConfig;
use crate::index::Index;
use crate::CrawlError;
use std::time::{Duration, Instant};
use url::Url;

/// When the coordinator stops calling `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// Stop once this many pages have been newly indexed
    NewPages(usize),
    /// Keep going until the queue is empty
    Exhausted,
}

/// What a coordinator run did
#[derive(Debug, Default)]
pub struct CrawlSummary {
    /// Number of `step` calls made
    pub steps: usize,

    /// URLs indexed during the run, in order
    pub indexed: Vec<Url>,

    /// Steps that dequeued an already indexed URL
    pub skipped: usize,

    /// URLs whose step failed, with the error message
    pub failures: Vec<(Url, String)>,

    /// True if the run ended because the queue was empty
    pub exhausted: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Runs a crawler according to a stop condition
pub struct Coordinator<I, F> {
    crawler: Crawler<I, F>,
    continue_on_error: bool,
}

impl<I: Index, F: Fetcher> Coordinator<I, F> {
    /// Creates a coordinator
    ///
    /// With `continue_on_error` a failed step is logged and recorded in the
    /// summary; otherwise the first failure ends the run with that error.
    pub fn new(crawler: Crawler<I, F>, continue_on_error: bool) -> Self {
        Self {
            crawler,
            continue_on_error,
        }
    }

    /// The crawler being driven
    pub fn crawler(&self) -> &Crawler<I, F> {
        &self.crawler
    }

    /// Mutable access to the crawler, e.g. to prime or re-enqueue
    pub fn crawler_mut(&mut self) -> &mut Crawler<I, F> {
        &mut self.crawler
    }

    /// Returns the crawler, ending the coordination
    pub fn into_crawler(self) -> Crawler<I, F> {
        self.crawler
    }

    /// Steps the crawler until `stop` is satisfied or the queue is empty
    pub async fn run(
        &mut self,
        mode: CrawlMode,
        stop: StopCondition,
    ) -> Result<CrawlSummary, CrawlError> {
        let start_time = Instant::now();
        let mut summary = CrawlSummary::default();

        tracing::info!(
            "Starting {:?} crawl from {} ({} pending)",
            mode,
            self.crawler.source(),
            self.crawler.pending_count()
        );

        while !stop_reached(stop, &summary) {
            let head = self.crawler.queued().next().cloned();

            match self.crawler.step(mode).await {
                Ok(StepOutcome::QueueExhausted) => {
                    tracing::info!("Queue is empty, crawl complete");
                    summary.exhausted = true;
                    break;
                }
                Ok(StepOutcome::Done(url)) => summary.indexed.push(url),
                Ok(StepOutcome::Empty) => summary.skipped += 1,
                Err(e) => {
                    let Some(url) = head else {
                        return Err(e);
                    };
                    if !self.continue_on_error {
                        tracing::error!("Step failed for {}: {}", url, e);
                        return Err(e);
                    }
                    tracing::warn!("Step failed for {}, continuing: {}", url, e);
                    summary.failures.push((url, e.to_string()));
                }
            }

            summary.steps += 1;

            if summary.steps % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = summary.steps as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} steps, {} indexed, {} skipped, {} pending, {:.2} steps/sec",
                    summary.steps,
                    summary.indexed.len(),
                    summary.skipped,
                    self.crawler.pending_count(),
                    rate
                );
            }
        }

        summary.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished: {} indexed, {} skipped, {} failed in {:?}",
            summary.indexed.len(),
            summary.skipped,
            summary.failures.len(),
            summary.elapsed
        );

        Ok(summary)
    }
}

fn stop_reached(stop: StopCondition, summary: &CrawlSummary) -> bool {
    match stop {
        StopCondition::NewPages(limit) => summary.indexed.len() >= limit,
        StopCondition::Exhausted => false,
    }
}

/// Builds a crawler for the configured source over `index`
pub fn build_crawler<I: Index>(
    config: &Config,
    index: I,
) -> Result<Crawler<I, HttpFetcher>, CrawlError> {
    let source = Url::parse(&config.crawler.source)?;
    let site = SiteConfig::from_config(&config.crawler)?;
    let fetcher = HttpFetcher::from_config(config)?;

    Ok(Crawler::new(source, index, fetcher, site))
}
