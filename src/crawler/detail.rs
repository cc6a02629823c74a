//! Detail page loading

use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::extract::{DetailLink, DetailRules, Record};

/// Fetches detail pages and extracts their records
#[derive(Debug, Clone)]
pub struct DetailPage {
    fetcher: PageFetcher,
    rules: DetailRules,
}

impl DetailPage {
    pub fn new(fetcher: PageFetcher, rules: DetailRules) -> Self {
        Self { fetcher, rules }
    }

    /// Field used to name persisted records
    pub fn name_field(&self) -> &str {
        self.rules.name_field()
    }

    /// Loads one detail page
    ///
    /// Returns `None` when the page could not be fetched; the detail is skipped
    /// rather than retried. Extraction only runs on a fetched body.
    pub async fn load_detail(&self, url: &DetailLink) -> Option<Record> {
        match self.fetcher.fetch(url.as_str()).await {
            FetchResult::Success { body } => {
                let record = self.rules.extract_record(&body);
                tracing::info!("get detail data {}", summarize(&record, self.name_field()));
                Some(record)
            }
            FetchResult::HttpError { status_code } => {
                tracing::error!("Skipping detail {}: HTTP {}", url, status_code);
                None
            }
            FetchResult::TransportError { error } => {
                tracing::error!("Skipping detail {}: {}", url, error);
                None
            }
        }
    }
}

fn summarize(record: &Record, name_field: &str) -> String {
    let present = record
        .iter()
        .filter(|(_, value)| !value.is_absent())
        .count();
    format!(
        "{:?} ({}/{} fields)",
        record.text(name_field).unwrap_or("<unnamed>"),
        present,
        record.len()
    )
}
