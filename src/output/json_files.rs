//! JSON file record sink
//!
//! Writes every record to `<dir>/<sanitized name>.json` as pretty-printed JSON.

use crate::extract::Record;
use crate::output::sanitize::sanitize_file_stem;
use crate::output::traits::RecordSink;
use crate::{PersistenceError, PersistenceResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores one JSON file per record in a directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Opens the sink, creating the output directory if it does not exist yet
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!("Writing records to {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a record would be written to, or why it cannot be named
    pub fn path_for(&self, record: &Record, name_field: &str) -> PersistenceResult<PathBuf> {
        let name = record
            .text(name_field)
            .ok_or_else(|| PersistenceError::MissingName(name_field.to_string()))?;
        let stem = sanitize_file_stem(name).ok_or_else(|| PersistenceError::EmptyName {
            field: name_field.to_string(),
            value: name.to_string(),
        })?;
        Ok(self.dir.join(format!("{}.json", stem)))
    }

    /// Reads a persisted record back
    pub fn load(&self, path: &Path) -> PersistenceResult<Record> {
        let content = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl RecordSink for JsonFileSink {
    fn persist(&self, record: &Record, name_field: &str) -> PersistenceResult<PathBuf> {
        let path = self.path_for(record, name_field)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}
