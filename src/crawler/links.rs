//! Internal link extraction
//!
//! Only references whose `href` starts with the site's link prefix are
//! followed. They are resolved against the site origin and returned in the
//! order they appear, across blocks, without deduplication.

use crate::config::CrawlerConfig;
use crate::crawler::ContentBlock;
use url::Url;

/// Where internal links point and how to recognise them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Scheme and host prepended to internal link paths
    pub origin: Url,

    /// Path prefix marking a link as internal, e.g. `/wiki/`
    pub link_prefix: String,
}

impl SiteConfig {
    /// Creates a site configuration from an origin URL and a link prefix
    pub fn new(origin: &str, link_prefix: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            origin: Url::parse(origin)?,
            link_prefix: link_prefix.to_string(),
        })
    }

    /// Builds the site configuration from the crawler section of the config file
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, url::ParseError> {
        Self::new(&config.site_origin, &config.link_prefix)
    }

    /// Returns true if `href` points into this site's collection
    pub fn is_internal(&self, href: &str) -> bool {
        href.starts_with(&self.link_prefix)
    }

    /// Resolves an internal path to an absolute URL on the site origin
    ///
    /// Returns `None` if the resolved path leaves the link prefix, as
    /// `/wiki/../w/index.php` does once dot segments are removed.
    pub fn resolve(&self, path: &str) -> Option<Url> {
        let url = match self.origin.join(path) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping unresolvable link {}: {}", path, e);
                return None;
            }
        };

        if !url.path().starts_with(&self.link_prefix) {
            tracing::debug!("Skipping link {} resolving outside {}", path, self.link_prefix);
            return None;
        }
        Some(url)
    }
}

/// Collects the absolute URLs of every internal link in `blocks`
pub(crate) fn internal_links(blocks: &[ContentBlock], site: &SiteConfig) -> Vec<Url> {
    blocks
        .iter()
        .flat_map(|block| block.hrefs())
        .filter(|href| site.is_internal(href))
        .filter_map(|href| site.resolve(&href))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::new("https://en.wikipedia.org", "/wiki/").unwrap()
    }

    fn as_strings(urls: &[Url]) -> Vec<&str> {
        urls.iter().map(Url::as_str).collect()
    }

    #[test]
    fn test_relative_path_resolved_against_origin() {
        let blocks = vec![ContentBlock::from_html(
            r#"<p><a href="/wiki/Philosophy">Philosophy</a></p>"#,
        )];

        let links = internal_links(&blocks, &site());

        assert_eq!(
            as_strings(&links),
            vec!["https://en.wikipedia.org/wiki/Philosophy"]
        );
    }

    #[test]
    fn test_external_and_non_prefixed_links_ignored() {
        let blocks = vec![ContentBlock::from_html(
            r##"<p>
                <a href="https://example.com/wiki/Elsewhere">abs</a>
                <a href="/w/index.php?title=Java">edit</a>
                <a href="#cite_note-1">note</a>
                <a href="wiki/Relative">rel</a>
                <a href="/wiki/Kept">kept</a>
            </p>"##,
        )];

        let links = internal_links(&blocks, &site());

        assert_eq!(as_strings(&links), vec!["https://en.wikipedia.org/wiki/Kept"]);
    }

    #[test]
    fn test_order_preserved_within_and_across_blocks() {
        let blocks = vec![
            ContentBlock::from_html(r#"<p><a href="/wiki/C">C</a><a href="/wiki/A">A</a></p>"#),
            ContentBlock::from_html(r#"<p>no links here</p>"#),
            ContentBlock::from_html(r#"<p><a href="/wiki/B">B</a></p>"#),
        ];

        let links = internal_links(&blocks, &site());

        assert_eq!(
            as_strings(&links),
            vec![
                "https://en.wikipedia.org/wiki/C",
                "https://en.wikipedia.org/wiki/A",
                "https://en.wikipedia.org/wiki/B",
            ]
        );
    }

    #[test]
    fn test_duplicates_kept() {
        let blocks = vec![
            ContentBlock::from_html(r#"<p><a href="/wiki/A">A</a><a href="/wiki/A">again</a></p>"#),
            ContentBlock::from_html(r#"<p><a href="/wiki/A">once more</a></p>"#),
        ];

        assert_eq!(internal_links(&blocks, &site()).len(), 3);
    }

    #[test]
    fn test_any_element_with_internal_href_counts() {
        let blocks = vec![ContentBlock::from_html(
            r#"<p><area href="/wiki/Map"><a href="/wiki/Text">t</a></p>"#,
        )];

        let links = internal_links(&blocks, &site());

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].path(), "/wiki/Map");
    }

    #[test]
    fn test_custom_prefix_and_origin() {
        let site = SiteConfig::new("http://127.0.0.1:8080", "/docs/").unwrap();
        let blocks = vec![ContentBlock::from_html(
            r#"<p><a href="/docs/intro">i</a><a href="/wiki/Nope">n</a></p>"#,
        )];

        let links = internal_links(&blocks, &site);

        assert_eq!(as_strings(&links), vec!["http://127.0.0.1:8080/docs/intro"]);
    }

    #[test]
    fn test_dot_segments_cannot_escape_prefix() {
        let blocks = vec![ContentBlock::from_html(
            r#"<p>
                <a href="/wiki/../w/index.php?action=edit">edit</a>
                <a href="/wiki/%2E%2E/w/api.php">api</a>
                <a href="/wiki/Foo/../Bar">bar</a>
            </p>"#,
        )];

        let links = internal_links(&blocks, &site());

        assert_eq!(as_strings(&links), vec!["https://en.wikipedia.org/wiki/Bar"]);
        assert!(site().resolve("/wiki/../Main_Page").is_none());
    }

    #[test]
    fn test_is_internal() {
        let site = site();
        assert!(site.is_internal("/wiki/Java"));
        assert!(!site.is_internal("/wiki"));
        assert!(!site.is_internal("https://en.wikipedia.org/wiki/Java"));
    }
}
