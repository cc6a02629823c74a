//! Output module for persisting records and reporting runs
//!
//! This module handles:
//! - The [`RecordSink`] interface records are persisted through
//! - Writing records as individually named JSON files
//! - Per-page reports and the final run summary

mod json_files;
mod sanitize;
pub mod stats;
mod traits;

pub use json_files::JsonFileSink;
pub use sanitize::sanitize_file_stem;
pub use stats::{print_summary, PageReport, RunSummary};
pub use traits::RecordSink;
