use crate::extract::Profile;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Main configuration structure for Listing-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL listing URLs are built from and relative links resolve against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Which built-in extraction rules to use
    pub profile: Profile,

    /// Category token for tag listings
    #[serde(default)]
    pub tag: Option<String>,

    /// Items per listing page (tag listings use it for the start offset)
    #[serde(rename = "page-size", default)]
    pub page_size: Option<u32>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of listing pages to crawl; discovered from page 1 when absent
    #[serde(rename = "total-pages", default)]
    pub total_pages: Option<u32>,

    /// Size of the worker pool; 0 or absent means one per available CPU
    #[serde(default)]
    pub workers: Option<usize>,

    /// Upper bound on a single request, including reading the body (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on establishing a connection (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header; sites that reject crawlers need a browser-like one
    #[serde(default)]
    pub value: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one JSON file per record
    #[serde(rename = "results-dir")]
    pub results_dir: String,
}

/// Values given on the command line, applied on top of the file before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub total_pages: Option<u32>,
    pub workers: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(total_pages) = self.total_pages {
            config.crawler.total_pages = Some(total_pages);
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = Some(workers);
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            total_pages: None,
            workers: None,
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl SiteConfig {
    /// Page size, falling back to the profile's default
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or_else(|| self.profile.default_page_size())
    }
}

impl CrawlerConfig {
    /// Resolved worker pool size
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}

impl UserAgentConfig {
    /// The User-Agent header value sent with every request
    pub fn header_value(&self) -> String {
        self.value
            .clone()
            .unwrap_or_else(|| format!("listing-harvest/{}", env!("CARGO_PKG_VERSION")))
    }
}
