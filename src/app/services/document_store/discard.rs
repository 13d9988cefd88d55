//! Non-retaining sink for dry runs

use super::indexes::IndexSpec;
use super::{DocumentSink, InsertAck, validate_collection_name};
use crate::Result;
use crate::app::models::NormalizedDocument;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// Accepts documents and drops them, keeping only counters
///
/// Memory use stays flat however many files a run covers.
#[derive(Debug, Default)]
pub struct DiscardSink {
    indexes: Vec<IndexSpec>,
    indexes_ensured: AtomicBool,
    accepted: AtomicUsize,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes reported (not created) by `ensure_indexes`
    pub fn with_indexes(indexes: Vec<IndexSpec>) -> Self {
        Self {
            indexes,
            ..Self::default()
        }
    }

    /// Documents accepted across all collections
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn indexes_ensured(&self) -> bool {
        self.indexes_ensured.load(Ordering::Relaxed)
    }
}

impl DocumentSink for DiscardSink {
    async fn ensure_indexes(&self) -> Result<()> {
        for spec in &self.indexes {
            debug!("Dry run: would ensure index '{}'", spec.name);
        }
        self.indexes_ensured.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn insert(&self, collection: &str, _document: &NormalizedDocument) -> Result<InsertAck> {
        validate_collection_name(collection)?;

        self.accepted.fetch_add(1, Ordering::Relaxed);
        Ok(InsertAck::generate())
    }
}
