//! Ingestion pipeline for directories of message files
//!
//! A bounded pool of workers parses and extracts files independently and
//! feeds one coordinating task, which owns every call into storage. Insert
//! order therefore follows completion order, not discovery order.
//!
//! # Architecture
//!
//! - [`document_stream`] - Worker pool producing one outcome per file
//! - [`indexer`] - Coordinator with per-insert timeouts and cancellation
//! - [`progress`] - Progress bar for interactive runs
//! - [`stats`] - Run statistics
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hl7_indexer::DocumentExtractor;
//! use hl7_indexer::app::services::document_store::JsonLinesStore;
//! use hl7_indexer::app::services::file_discovery::discover_message_files;
//! use hl7_indexer::app::services::ingest::{Indexer, IndexerOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> hl7_indexer::Result<()> {
//! let files = discover_message_files(std::path::Path::new("./inbox"), false)?;
//! let store = Arc::new(JsonLinesStore::new("./output"));
//! let indexer = Indexer::new(store, DocumentExtractor::default(), IndexerOptions::default());
//!
//! let stats = indexer.run(files, CancellationToken::new()).await?;
//! println!("{}", stats.summary());
//! # Ok(())
//! # }
//! ```

pub mod document_stream;
pub mod indexer;
pub mod progress;
pub mod stats;

#[cfg(test)]
mod tests;

pub use document_stream::{
    DocumentStream, IngestOutcome, TextDecoding, process_file, read_message_file,
    read_message_text,
};
pub use indexer::{Indexer, IndexerOptions};
pub use progress::{ProgressReporter, create_progress_bar};
pub use stats::{FileFailure, IngestStats};
