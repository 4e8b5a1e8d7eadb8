//! Persistent operation history.
//!
//! Every completed operation can be recorded as an [`OperationRecord`];
//! the log is a JSON array on disk, rewritten after each mutation. A
//! missing or unreadable file opens as an empty log.

use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One recorded operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub timestamp: DateTime<Utc>,
    /// Operation name, e.g. `"split_by_count"`.
    pub operation: String,
    pub input_files: Vec<PathBuf>,
    pub output_files: Vec<PathBuf>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl OperationRecord {
    pub fn success(
        operation: &str,
        input_files: Vec<PathBuf>,
        output_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.to_string(),
            input_files,
            output_files,
            success: true,
            error_message: None,
        }
    }

    pub fn failure(operation: &str, input_files: Vec<PathBuf>, error: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.to_string(),
            input_files,
            output_files: Vec::new(),
            success: false,
            error_message: Some(error),
        }
    }
}

/// JSON-backed log of operation records, oldest first on disk.
pub struct HistoryLog {
    path: PathBuf,
    records: Vec<OperationRecord>,
}

impl HistoryLog {
    /// Open the log at `path`, loading any existing records. A missing
    /// file yields an empty log; a corrupt one is discarded with a warning
    /// rather than failing the caller.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(records) => records,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "discarding corrupt history file");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { path, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record and persist the log.
    pub fn add(&mut self, record: OperationRecord) -> Result<()> {
        self.records.push(record);
        self.save()
    }

    /// The most recent `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&OperationRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    /// Remove the record at `index` (oldest-first indexing) and persist.
    /// Returns `false` when the index is out of range.
    pub fn delete_record(&mut self, index: usize) -> Result<bool> {
        if index >= self.records.len() {
            return Ok(false);
        }
        self.records.remove(index);
        self.save()?;
        Ok(true)
    }

    /// Drop every record and persist the empty log.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| EngineError::Backend(format!("cannot serialize history: {e}")))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
