//! Per-page reports and the run summary built from them
//!
//! Page tasks do not share counters. Each returns its own [`PageReport`] and the
//! coordinator folds them into a [`RunSummary`] once every task has finished.

use chrono::{DateTime, Utc};

/// Outcome of one listing page task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReport {
    pub page_number: u32,

    /// Detail links found on the listing page
    pub links_found: usize,

    /// Records written to the sink
    pub records_saved: usize,

    /// Detail pages that could not be fetched
    pub details_skipped: usize,

    /// Records extracted but not persisted
    pub persistence_failures: usize,
}

impl PageReport {
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            ..Self::default()
        }
    }
}

/// Crawl run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Listing pages scheduled
    pub pages_total: u32,

    /// Listing pages that produced at least one link
    pub pages_with_links: u32,

    /// Page tasks that died before returning a report
    pub pages_failed: u32,

    pub links_found: usize,
    pub records_saved: usize,
    pub details_skipped: usize,
    pub persistence_failures: usize,
}

impl RunSummary {
    /// Starts an empty summary for a run of `pages_total` pages
    pub fn new(pages_total: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            pages_total,
            pages_with_links: 0,
            pages_failed: 0,
            links_found: 0,
            records_saved: 0,
            details_skipped: 0,
            persistence_failures: 0,
        }
    }

    /// Adds one page's report
    pub fn record_page(&mut self, report: &PageReport) {
        if report.links_found > 0 {
            self.pages_with_links += 1;
        }
        self.links_found += report.links_found;
        self.records_saved += report.records_saved;
        self.details_skipped += report.details_skipped;
        self.persistence_failures += report.persistence_failures;
    }

    /// Counts a page task that never returned a report
    pub fn record_failed_page(&mut self) {
        self.pages_failed += 1;
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = finished_at;
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Logs the summary
    pub fn log(&self) {
        tracing::info!(
            "Crawl completed in {}s: {}/{} pages with links, {} links, {} records saved, {} details skipped, {} records not saved, {} page tasks failed",
            self.duration_seconds(),
            self.pages_with_links,
            self.pages_total,
            self.links_found,
            self.records_saved,
            self.details_skipped,
            self.persistence_failures,
            self.pages_failed
        );
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");
    println!("Started:  {}", summary.started_at.to_rfc3339());
    println!("Finished: {}", summary.finished_at.to_rfc3339());
    println!("Duration: {}s\n", summary.duration_seconds());

    println!("Listing pages:");
    println!("  Scheduled:     {}", summary.pages_total);
    println!("  With links:    {}", summary.pages_with_links);
    println!("  Tasks failed:  {}", summary.pages_failed);

    println!("\nDetail pages:");
    println!("  Links found:   {}", summary.links_found);
    println!("  Records saved: {}", summary.records_saved);
    println!("  Skipped:       {}", summary.details_skipped);
    println!("  Not saved:     {}", summary.persistence_failures);
}
