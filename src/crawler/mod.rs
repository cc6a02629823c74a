//! Crawler module for listing and detail page processing
//!
//! This module contains the core crawling logic, including:
//! - Single-shot HTTP fetching with outcome classification
//! - Listing page loading and page-count discovery
//! - Detail page loading and record extraction
//! - Overall crawl coordination across a bounded worker pool

mod coordinator;
mod detail;
mod fetcher;
mod index;

pub use coordinator::{run_harvest, Coordinator};
pub use detail::DetailPage;
pub use fetcher::{build_http_client, FetchResult, PageFetcher};
pub use index::{IndexPage, ListingUrls};

/// One listing page to crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u32,
}

impl PageRequest {
    pub fn new(page_number: u32) -> Self {
        Self { page_number }
    }

    pub fn first() -> Self {
        Self::new(1)
    }

    /// Pages `1..=total_pages`
    pub fn range(total_pages: u32) -> impl Iterator<Item = Self> {
        (1..=total_pages).map(Self::new)
    }
}
