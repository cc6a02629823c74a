//! Record sink trait
//!
//! This module defines the interface the crawler persists records through.

use crate::extract::Record;
use crate::PersistenceResult;
use std::path::PathBuf;

/// Trait for record storage implementations
///
/// Implementations are shared across all page tasks, so they must be safe to
/// call concurrently. Two records that map to the same identifier overwrite each
/// other; no ordering between them is promised.
pub trait RecordSink: Send + Sync {
    /// Persists one record under a name derived from `name_field`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the record was written
    /// * `Err(PersistenceError)` - The record has no usable name or could not be written
    fn persist(&self, record: &Record, name_field: &str) -> PersistenceResult<PathBuf>;
}
