//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a whole harvest:
//! - Resolving how many listing pages to crawl
//! - Running one task per listing page on a bounded worker pool
//! - Within a task: listing page → detail pages → record sink, in sequence
//! - Folding the per-page reports into a run summary

use crate::config::Config;
use crate::crawler::detail::DetailPage;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::index::{IndexPage, ListingUrls};
use crate::crawler::PageRequest;
use crate::extract::SiteRules;
use crate::output::{JsonFileSink, PageReport, RecordSink, RunSummary};
use crate::{ConfigError, ConfigResult, HarvestError};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    index: Arc<IndexPage>,
    detail: Arc<DetailPage>,
    sink: Arc<dyn RecordSink>,
    workers: usize,
}

impl Coordinator {
    /// Creates a coordinator from its parts
    ///
    /// `workers` is the number of listing pages processed at the same time; it is
    /// raised to 1 if given as 0.
    pub fn new(
        index: IndexPage,
        detail: DetailPage,
        sink: Arc<dyn RecordSink>,
        workers: usize,
    ) -> Self {
        Self {
            index: Arc::new(index),
            detail: Arc::new(detail),
            sink,
            workers: workers.max(1),
        }
    }

    /// Builds the fetcher, rules and pool size from `config`, persisting into `sink`
    pub fn from_config(config: &Config, sink: Arc<dyn RecordSink>) -> Result<Self, HarvestError> {
        let listing = ListingUrls::from_site(&config.site)?;
        let rules = SiteRules::for_profile(config.site.profile, listing.base().clone())
            .map_err(ConfigError::from)?;
        let fetcher = PageFetcher::from_config(config)?;

        let index = IndexPage::new(fetcher.clone(), listing, rules.links, rules.page_count);
        let detail = DetailPage::new(fetcher, rules.detail);

        Ok(Self::new(index, detail, sink, config.crawler.worker_count()))
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Determines the page bound; see [`IndexPage::resolve_total_pages`]
    pub async fn resolve_total_pages(&self, configured: Option<u32>) -> ConfigResult<u32> {
        self.index.resolve_total_pages(configured).await
    }

    /// Crawls listing pages `1..=total_pages`
    ///
    /// Each page is an independent task; at most `workers` of them run at once and
    /// they finish in no particular order. Failures inside a page are logged and
    /// counted, never propagated, so this always runs to completion.
    pub async fn run(&self, total_pages: u32) -> RunSummary {
        tracing::info!(
            "Starting crawl of {} listing pages with {} workers",
            total_pages,
            self.workers
        );

        let mut summary = RunSummary::new(total_pages, Utc::now());
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for page in PageRequest::range(total_pages) {
            // Wait for a free worker before spawning the next page task
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Worker pool closed before page {}: {}", page.page_number, e);
                    break;
                }
            };

            let index = Arc::clone(&self.index);
            let detail = Arc::clone(&self.detail);
            let sink = Arc::clone(&self.sink);

            tasks.spawn(async move {
                let _permit = permit;
                process_page(&index, &detail, sink, page).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => summary.record_page(&report),
                Err(e) => {
                    tracing::error!("Page task failed: {}", e);
                    summary.record_failed_page();
                }
            }
        }

        summary.finish(Utc::now());
        summary.log();
        summary
    }
}

/// Processes one listing page and every detail page it links to
///
/// Records are written on the blocking pool so file IO never stalls a runtime
/// worker.
async fn process_page(
    index: &IndexPage,
    detail: &DetailPage,
    sink: Arc<dyn RecordSink>,
    page: PageRequest,
) -> PageReport {
    let mut report = PageReport::new(page.page_number);

    let links = index.load_index(page).await;
    report.links_found = links.len();

    for link in links {
        let Some(record) = detail.load_detail(&link).await else {
            report.details_skipped += 1;
            continue;
        };

        tracing::info!("saving data to json file");
        let sink = Arc::clone(&sink);
        let name_field = detail.name_field().to_string();
        let saved =
            tokio::task::spawn_blocking(move || sink.persist(&record, &name_field)).await;

        match saved {
            Ok(Ok(path)) => {
                report.records_saved += 1;
                tracing::info!("data saved successfully to {}", path.display());
            }
            Ok(Err(e)) => {
                report.persistence_failures += 1;
                tracing::error!("Failed to save record from {}: {}", link, e);
            }
            Err(e) => {
                report.persistence_failures += 1;
                tracing::error!("Save task for {} failed: {}", link, e);
            }
        }
    }

    tracing::debug!(
        "Listing page {} done: {} links, {} saved",
        page.page_number,
        report.links_found,
        report.records_saved
    );
    report
}

/// Runs a complete harvest as described by `config`
///
/// 1. Build the fetcher and site rules
/// 2. Open the output directory
/// 3. Resolve the page bound (`page_override`, then config, then discovery)
/// 4. Crawl every page and return the summary
///
/// Only configuration problems and an unusable output directory are errors;
/// everything that goes wrong per page or per record is absorbed into the summary.
///
/// # Example
///
/// ```no_run
/// use listing_harvest::config::load_config;
/// use listing_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_harvest(&config, None).await?;
/// println!("{} records saved", summary.records_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config, page_override: Option<u32>) -> crate::Result<RunSummary> {
    let sink = JsonFileSink::new(&config.output.results_dir)?;
    let coordinator = Coordinator::from_config(config, Arc::new(sink))?;

    let total_pages = coordinator
        .resolve_total_pages(page_override.or(config.crawler.total_pages))
        .await?;

    Ok(coordinator.run(total_pages).await)
}
