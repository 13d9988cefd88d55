//! Test utilities for the ingestion pipeline

mod indexer_tests;
mod stream_tests;

use crate::Result;
use crate::app::models::NormalizedDocument;
use crate::app::services::document_store::{DocumentSink, InsertAck};
use crate::app::services::segment_parser::tests::{
    create_test_adt_message, create_test_oru_message,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Write a directory of message files: two valid, one non-UTF-8
pub fn create_test_inbox(root: &Path) -> Vec<PathBuf> {
    let files = vec![
        root.join("01_results.hl7"),
        root.join("02_admit.txt"),
        root.join("03_binary.hl7"),
    ];
    std::fs::write(&files[0], create_test_oru_message()).unwrap();
    std::fs::write(&files[1], create_test_adt_message()).unwrap();
    std::fs::write(&files[2], [0x4d, 0x53, 0x48, 0xff, 0xfe, 0x7c]).unwrap();
    files
}

/// Sink that rejects documents whose control id matches
pub struct RejectingSink {
    pub reject_control_id: String,
    pub inserted: AtomicUsize,
    pub ensured: AtomicUsize,
}

impl RejectingSink {
    pub fn new(reject_control_id: &str) -> Self {
        Self {
            reject_control_id: reject_control_id.to_string(),
            inserted: AtomicUsize::new(0),
            ensured: AtomicUsize::new(0),
        }
    }
}

impl DocumentSink for RejectingSink {
    async fn ensure_indexes(&self) -> Result<()> {
        self.ensured.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn insert(&self, _collection: &str, document: &NormalizedDocument) -> Result<InsertAck> {
        if document.control_id.as_deref() == Some(self.reject_control_id.as_str()) {
            return Err(crate::Error::storage("document rejected"));
        }
        self.inserted.fetch_add(1, Ordering::SeqCst);
        Ok(InsertAck::generate())
    }
}

/// Sink whose inserts never finish in time
pub struct StalledSink {
    pub delay: Duration,
}

impl DocumentSink for StalledSink {
    async fn ensure_indexes(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, _collection: &str, _document: &NormalizedDocument) -> Result<InsertAck> {
        tokio::time::sleep(self.delay).await;
        Ok(InsertAck::generate())
    }
}
