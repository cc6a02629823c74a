//! Listing page loading and page-count discovery

use crate::config::SiteConfig;
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::PageRequest;
use crate::extract::{DetailLink, LinkRule, ListingMode, PageCountRule};
use crate::ConfigError;
use url::Url;

/// How listing page URLs are derived from a page number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingUrls {
    /// `{base}/page/{n}`
    Paged { base: Url },
    /// `{base}/{tag}?start={(n - 1) * page_size}&type=T`
    Tag {
        base: Url,
        tag: String,
        page_size: u32,
    },
}

impl ListingUrls {
    /// Derives the listing scheme from the site configuration
    pub fn from_site(site: &SiteConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", site.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                site.base_url
            )));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(ConfigError::InvalidUrl(format!(
                "{} must not carry a query or fragment",
                site.base_url
            )));
        }

        match site.profile.listing_mode() {
            ListingMode::Paged => Ok(Self::Paged { base }),
            ListingMode::Tag => {
                let tag = site
                    .tag
                    .as_deref()
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .ok_or_else(|| {
                        ConfigError::Validation("tag listings need site.tag".to_string())
                    })?;
                Ok(Self::Tag {
                    base,
                    tag: tag.to_string(),
                    page_size: site.page_size(),
                })
            }
        }
    }

    /// Base URL relative links are resolved against
    pub fn base(&self) -> &Url {
        match self {
            Self::Paged { base } | Self::Tag { base, .. } => base,
        }
    }

    /// Builds the listing URL for one page
    pub fn url_for(&self, page: PageRequest) -> String {
        match self {
            Self::Paged { base } => {
                let mut url = base.clone();
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments
                        .pop_if_empty()
                        .push("page")
                        .push(&page.page_number.to_string());
                }
                url.to_string()
            }
            Self::Tag {
                base,
                tag,
                page_size,
            } => {
                let offset = page.page_number.saturating_sub(1) as u64 * *page_size as u64;
                let mut url = base.clone();
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(tag);
                }
                url.query_pairs_mut()
                    .append_pair("start", &offset.to_string())
                    .append_pair("type", "T");
                url.to_string()
            }
        }
    }
}

/// Loads listing pages and pulls detail links off them
#[derive(Debug, Clone)]
pub struct IndexPage {
    fetcher: PageFetcher,
    listing: ListingUrls,
    links: LinkRule,
    page_count: Option<PageCountRule>,
}

impl IndexPage {
    pub fn new(
        fetcher: PageFetcher,
        listing: ListingUrls,
        links: LinkRule,
        page_count: Option<PageCountRule>,
    ) -> Self {
        Self {
            fetcher,
            listing,
            links,
            page_count,
        }
    }

    pub fn listing_url(&self, page: PageRequest) -> String {
        self.listing.url_for(page)
    }

    /// Returns the detail links of one listing page, in page order
    ///
    /// A page that cannot be fetched yields no links; the failure is logged and
    /// the link rule is never run on a missing body.
    pub async fn load_index(&self, page: PageRequest) -> Vec<DetailLink> {
        let url = self.listing_url(page);
        match self.fetcher.fetch(&url).await {
            FetchResult::Success { body } => self.links.extract_links(&body),
            FetchResult::HttpError { status_code } => {
                tracing::error!(
                    "Skipping listing page {}: HTTP {}",
                    page.page_number,
                    status_code
                );
                Vec::new()
            }
            FetchResult::TransportError { error } => {
                tracing::error!("Skipping listing page {}: {}", page.page_number, error);
                Vec::new()
            }
        }
    }

    /// Reads the total page count from a listing page body
    pub fn discover_page_count(&self, body: &str) -> Option<u32> {
        self.page_count
            .as_ref()
            .and_then(|rule| rule.discover_page_count(body))
    }

    /// Determines how many listing pages the crawl covers
    ///
    /// An explicit bound wins. Otherwise the first listing page is fetched and its
    /// pagination control read; if that fails the crawl has no bounds, which is a
    /// configuration error.
    pub async fn resolve_total_pages(&self, configured: Option<u32>) -> Result<u32, ConfigError> {
        if let Some(total) = configured {
            return Ok(total);
        }

        let url = self.listing_url(PageRequest::first());
        if self.page_count.is_none() {
            return Err(ConfigError::PageCountUnavailable {
                url,
                reason: "the site profile has no pagination rule".to_string(),
            });
        }

        let body = match self.fetcher.fetch(&url).await {
            FetchResult::Success { body } => body,
            FetchResult::HttpError { status_code } => {
                return Err(ConfigError::PageCountUnavailable {
                    url,
                    reason: format!("listing page answered HTTP {}", status_code),
                })
            }
            FetchResult::TransportError { error } => {
                return Err(ConfigError::PageCountUnavailable { url, reason: error })
            }
        };

        match self.discover_page_count(&body) {
            Some(total) => {
                tracing::info!("Discovered {} listing pages", total);
                Ok(total)
            }
            None => Err(ConfigError::PageCountUnavailable {
                url,
                reason: "no page number precedes the next-page marker".to_string(),
            }),
        }
    }
}
