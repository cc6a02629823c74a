use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Largest worker pool accepted from configuration
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_page_bound(config)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used to resolve links",
            config.base_url
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must not carry a query or fragment",
            config.base_url
        )));
    }

    if config.page_size == Some(0) {
        return Err(ConfigError::Validation(
            "page-size must be >= 1".to_string(),
        ));
    }

    if config.profile.listing_mode() == crate::extract::ListingMode::Tag {
        match config.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "profile '{}' lists by tag; site.tag must be set",
                    config.profile
                )))
            }
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.total_pages == Some(0) {
        return Err(ConfigError::Validation(
            "total-pages must be >= 1 when set".to_string(),
        ));
    }

    if let Some(workers) = config.workers {
        if workers > MAX_WORKERS {
            return Err(ConfigError::Validation(format!(
                "workers must be between 0 and {}, got {}",
                MAX_WORKERS, workers
            )));
        }
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Checks that the crawl can be bounded at all
fn validate_page_bound(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.total_pages.is_none() && !config.site.profile.discovers_page_count() {
        return Err(ConfigError::Validation(format!(
            "profile '{}' cannot discover its page count; set crawler.total-pages",
            config.site.profile
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if let Some(value) = &config.value {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent value cannot be empty".to_string(),
            ));
        }

        if value.chars().any(char::is_control) {
            return Err(ConfigError::Validation(
                "user-agent value cannot contain control characters".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "results-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Profile;

    fn movies_config() -> Config {
        Config {
            site: SiteConfig {
                base_url: "https://ssr1.scrape.center".to_string(),
                profile: Profile::Movies,
                tag: None,
                page_size: None,
            },
            crawler: CrawlerConfig {
                total_pages: Some(10),
                ..CrawlerConfig::default()
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig {
                results_dir: "results".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&movies_config()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = movies_config();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "ftp://example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "mailto:someone@example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "https://x.com/list?cat=1".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "https://x.com/list#top".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.base_url = "https://x.com/list/".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_books_require_tag() {
        let mut config = movies_config();
        config.site.profile = Profile::Books;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.site.tag = Some("  ".to_string());
        assert!(validate(&config).is_err());

        config.site.tag = Some("编程".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_movies_require_total_pages() {
        let mut config = movies_config();
        config.crawler.total_pages = None;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_books_may_discover_total_pages() {
        let mut config = movies_config();
        config.site.profile = Profile::Books;
        config.site.tag = Some("编程".to_string());
        config.crawler.total_pages = None;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_crawler_limits() {
        let mut config = movies_config();
        config.crawler.total_pages = Some(0);
        assert!(validate(&config).is_err());

        let mut config = movies_config();
        config.crawler.workers = Some(MAX_WORKERS + 1);
        assert!(validate(&config).is_err());

        let mut config = movies_config();
        config.crawler.workers = Some(0);
        assert!(validate(&config).is_ok());

        let mut config = movies_config();
        config.crawler.connect_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_page_size_and_output() {
        let mut config = movies_config();
        config.site.page_size = Some(0);
        assert!(validate(&config).is_err());

        let mut config = movies_config();
        config.output.results_dir = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_user_agent() {
        let mut config = movies_config();
        config.user_agent.value = Some(String::new());
        assert!(validate(&config).is_err());

        config.user_agent.value = Some("Bot/1.0\n".to_string());
        assert!(validate(&config).is_err());

        config.user_agent.value = Some("Mozilla/5.0 (X11; Linux x86_64)".to_string());
        assert!(validate(&config).is_ok());
    }
}
