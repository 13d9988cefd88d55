//! Statistics for an indexing run

use crate::Error;
use crate::app::models::MessageKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// A file that could not be read, extracted or stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Counters accumulated by the indexer
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub files_discovered: usize,
    pub files_indexed: usize,
    pub files_failed: usize,
    /// Indexed documents per message kind label
    pub documents_by_kind: BTreeMap<String, usize>,
    pub registry_flagged: usize,
    pub worker_failures: usize,
    pub interrupted: bool,
    pub failures: Vec<FileFailure>,
    #[serde(skip)]
    pub processing_time: Duration,
}

impl IngestStats {
    pub fn new(files_discovered: usize) -> Self {
        Self {
            files_discovered,
            ..Default::default()
        }
    }

    /// Count a stored document
    pub fn record_indexed(&mut self, kind: MessageKind, registry_flagged: bool) {
        self.files_indexed += 1;
        *self
            .documents_by_kind
            .entry(kind.label().to_string())
            .or_insert(0) += 1;
        if registry_flagged {
            self.registry_flagged += 1;
        }
    }

    /// Count a failed file and keep its error for the report
    pub fn record_failure(&mut self, file: &Path, error: &Error) {
        self.files_failed += 1;
        self.failures.push(FileFailure {
            file: file.display().to_string(),
            error: error.to_string(),
        });
    }

    /// Files that reached the coordinator, stored or not
    pub fn files_processed(&self) -> usize {
        self.files_indexed + self.files_failed
    }

    /// Files discovered but never processed (cancellation or worker loss)
    pub fn files_skipped(&self) -> usize {
        self.files_discovered.saturating_sub(self.files_processed())
    }

    /// Percentage of processed files that were stored
    pub fn success_rate(&self) -> f64 {
        if self.files_processed() == 0 {
            0.0
        } else {
            (self.files_indexed as f64 / self.files_processed() as f64) * 100.0
        }
    }

    pub fn files_per_second(&self) -> f64 {
        let secs = self.processing_time.as_secs_f64();
        if secs > 0.0 {
            self.files_processed() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.interrupted && self.files_failed == 0 && self.files_skipped() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Files: {} discovered, {} indexed, {} failed ({:.1}% success rate)\n\
             Registry: {} documents flagged\n\
             Duration: {:.2}s ({:.1} files/sec)",
            self.files_discovered,
            self.files_indexed,
            self.files_failed,
            self.success_rate(),
            self.registry_flagged,
            self.processing_time.as_secs_f64(),
            self.files_per_second()
        )
    }
}
