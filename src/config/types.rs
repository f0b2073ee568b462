use serde::Deserialize;

/// Main configuration structure for Wiki-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Page the crawl starts from
    pub source: String,

    /// Scheme and host that internal link paths are resolved against
    #[serde(rename = "site-origin")]
    pub site_origin: String,

    /// Path prefix identifying links into the same collection
    #[serde(rename = "link-prefix", default = "default_link_prefix")]
    pub link_prefix: String,

    /// Minimum time between network requests (milliseconds)
    #[serde(
        rename = "minimum-time-between-requests",
        default = "default_minimum_time_between_requests"
    )]
    pub minimum_time_between_requests: u64,

    /// Keep crawling when a step fails instead of aborting
    #[serde(rename = "continue-on-error", default)]
    pub continue_on_error: bool,
}

/// Page retrieval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// CSS selector picking the content blocks of a page
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// Directory holding saved pages for test mode
    #[serde(rename = "fixtures-dir", default = "default_fixtures_dir")]
    pub fixtures_dir: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            content_selector: default_content_selector(),
            fixtures_dir: default_fixtures_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite index file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_link_prefix() -> String {
    "/wiki/".to_string()
}

fn default_minimum_time_between_requests() -> u64 {
    1000
}

fn default_content_selector() -> String {
    "#mw-content-text p".to_string()
}

fn default_fixtures_dir() -> String {
    "resources".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
