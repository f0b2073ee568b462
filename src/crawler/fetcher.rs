//! Page fetcher implementation
//!
//! This module handles retrieving pages for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with status checking for normal crawls
//! - Reading saved pages from a fixtures directory for test crawls
//! - Enforcing a minimum delay between network requests

use crate::config::{Config, UserAgentConfig};
use crate::crawler::parser::{parse_content_blocks, ContentBlock};
use crate::crawler::CrawlMode;
use crate::{CrawlError, FetchError, FetchResult};
use reqwest::Client;
use scraper::Selector;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Retrieves the content blocks of a page
///
/// `CrawlMode::Test` must be deterministic and must not touch the network;
/// `CrawlMode::Normal` fetches the live page.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &Url, mode: CrawlMode) -> FetchResult<Vec<ContentBlock>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Overall request timeout
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wiki_ripple::config::UserAgentConfig;
/// use wiki_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "WikiRipple".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by HTTP for normal crawls and a fixtures directory for tests
pub struct HttpFetcher {
    client: Client,
    selector: Selector,
    fixtures_dir: PathBuf,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    /// Creates a fetcher from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.fetcher.timeout_secs),
        )?;

        let fetcher = Self::new(
            client,
            &config.fetcher.content_selector,
            Path::new(&config.fetcher.fixtures_dir),
            Duration::from_millis(config.crawler.minimum_time_between_requests),
        )?;

        Ok(fetcher)
    }

    /// Creates a fetcher from its parts
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used in normal mode
    /// * `content_selector` - CSS selector for the content blocks of a page
    /// * `fixtures_dir` - Root of the saved pages used in test mode
    /// * `min_interval` - Minimum time between two network requests
    pub fn new(
        client: Client,
        content_selector: &str,
        fixtures_dir: &Path,
        min_interval: Duration,
    ) -> FetchResult<Self> {
        let selector =
            Selector::parse(content_selector).map_err(|e| FetchError::InvalidSelector {
                selector: content_selector.to_string(),
                message: format!("{:?}", e),
            })?;

        Ok(Self {
            client,
            selector,
            fixtures_dir: fixtures_dir.to_path_buf(),
            min_interval,
            last_request: Mutex::new(None),
        })
    }

    /// Location of the saved copy of `url`: `<fixtures-dir>/<host><path>`
    pub fn fixture_path(&self, url: &Url) -> FetchResult<PathBuf> {
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::UnsupportedUrl(url.to_string()))?;

        let mut path = self.fixtures_dir.join(host);
        for segment in url.path().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        Ok(path)
    }

    /// Reads and parses the saved copy of `url`
    pub fn read_fixture(&self, url: &Url) -> FetchResult<Vec<ContentBlock>> {
        let path = self.fixture_path(url)?;
        let html = std::fs::read_to_string(&path).map_err(|source| FetchError::Fixture {
            path: path.display().to_string(),
            source,
        })?;

        Ok(parse_content_blocks(&html, &self.selector))
    }

    /// Downloads and parses the live page at `url`
    pub async fn fetch_remote(&self, url: &Url) -> FetchResult<Vec<ContentBlock>> {
        self.wait_for_turn().await;

        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        let blocks = parse_content_blocks(&body, &self.selector);

        tracing::debug!("Fetched {} ({} blocks)", url, blocks.len());
        Ok(blocks)
    }

    /// Sleeps until `min_interval` has passed since the previous request
    async fn wait_for_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                tracing::trace!("Waiting {:?} before next request", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, mode: CrawlMode) -> FetchResult<Vec<ContentBlock>> {
        match mode {
            CrawlMode::Test => self.read_fixture(url),
            CrawlMode::Normal => self.fetch_remote(url).await,
        }
    }
}
