use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let source = parse_http_url("source", &config.source)?;
    let origin = parse_http_url("site-origin", &config.site_origin)?;

    if origin.path() != "/" || origin.query().is_some() {
        return Err(ConfigError::Validation(format!(
            "site-origin must be a bare scheme and host, got '{}'",
            config.site_origin
        )));
    }

    if source.origin() != origin.origin() {
        return Err(ConfigError::Validation(format!(
            "source '{}' is not on site-origin '{}'",
            config.source, config.site_origin
        )));
    }

    validate_link_prefix(&config.link_prefix)?;

    Ok(())
}

/// Validates page retrieval configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    Selector::parse(&config.content_selector).map_err(|e| {
        ConfigError::Validation(format!(
            "content-selector '{}' is not a valid CSS selector: {:?}",
            config.content_selector, e
        ))
    })?;

    if config.fixtures_dir.is_empty() {
        return Err(ConfigError::Validation(
            "fixtures-dir cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses a URL field and requires an http or https scheme
fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(url)
}

/// Link prefixes are absolute paths ending in a slash, e.g. `/wiki/`
fn validate_link_prefix(prefix: &str) -> Result<(), ConfigError> {
    if !prefix.starts_with('/') || !prefix.ends_with('/') || prefix.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "link-prefix must start and end with '/', got '{}'",
            prefix
        )));
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "link-prefix cannot contain whitespace, got '{}'",
            prefix
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler_config(source: &str, origin: &str) -> CrawlerConfig {
        CrawlerConfig {
            source: source.to_string(),
            site_origin: origin.to_string(),
            link_prefix: "/wiki/".to_string(),
            minimum_time_between_requests: 1000,
            continue_on_error: false,
        }
    }

    #[test]
    fn test_validate_crawler_config() {
        let ok = crawler_config(
            "https://en.wikipedia.org/wiki/Philosophy",
            "https://en.wikipedia.org",
        );
        assert!(validate_crawler_config(&ok).is_ok());

        let trailing_slash = crawler_config(
            "https://en.wikipedia.org/wiki/Philosophy",
            "https://en.wikipedia.org/",
        );
        assert!(validate_crawler_config(&trailing_slash).is_ok());

        let with_path = crawler_config(
            "https://en.wikipedia.org/wiki/Philosophy",
            "https://en.wikipedia.org/wiki",
        );
        assert!(validate_crawler_config(&with_path).is_err());

        let other_host = crawler_config(
            "https://fr.wikipedia.org/wiki/Philosophie",
            "https://en.wikipedia.org",
        );
        assert!(validate_crawler_config(&other_host).is_err());

        let ftp = crawler_config("ftp://en.wikipedia.org/wiki/X", "ftp://en.wikipedia.org");
        assert!(validate_crawler_config(&ftp).is_err());

        let relative = crawler_config("/wiki/Philosophy", "https://en.wikipedia.org");
        assert!(matches!(
            validate_crawler_config(&relative),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_link_prefix() {
        assert!(validate_link_prefix("/wiki/").is_ok());
        assert!(validate_link_prefix("/docs/en/").is_ok());

        assert!(validate_link_prefix("").is_err());
        assert!(validate_link_prefix("/").is_err());
        assert!(validate_link_prefix("wiki/").is_err());
        assert!(validate_link_prefix("/wiki").is_err());
        assert!(validate_link_prefix("/my wiki/").is_err());
    }

    #[test]
    fn test_validate_fetcher_config() {
        let mut config = FetcherConfig::default();
        assert!(validate_fetcher_config(&config).is_ok());

        config.content_selector = "p[".to_string();
        assert!(validate_fetcher_config(&config).is_err());

        let mut config = FetcherConfig::default();
        config.timeout_secs = 0;
        assert!(validate_fetcher_config(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
