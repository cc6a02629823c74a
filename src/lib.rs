//! Listing-Harvest: a listing-to-detail page harvester
//!
//! This crate walks the paginated listing pages of a site, follows every detail
//! link found on them, extracts a structured record from each detail page using
//! pattern rules, and writes each record to its own JSON file.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;

use thiserror::Error;

/// Main error type for Listing-Harvest operations
///
/// Only process-level failures surface here. Failed fetches are carried by
/// [`crawler::FetchResult`] and missing fields by [`extract::Record`]. A
/// [`PersistenceError`] only ever fails its own record and is counted in the
/// run summary instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only errors allowed to abort a run, and only before any page
/// task has been scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Cannot determine page count from {url}: {reason}")]
    PageCountUnavailable { url: String, reason: String },
}

/// Errors raised while persisting a single record
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Record has no value for name field '{0}'")]
    MissingName(String),

    #[error("Name field '{field}' value {value:?} sanitizes to an empty file name")]
    EmptyName { field: String, value: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for Listing-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for persistence operations
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, FetchResult, PageFetcher};
pub use extract::{FieldValue, Profile, Record};
pub use output::{JsonFileSink, RecordSink, RunSummary};
