//! Indexing coordinator
//!
//! Consumes the [`DocumentStream`] on a single task and hands every
//! extracted document to the [`DocumentSink`]. Each insert runs under its
//! own timeout; a failed file or insert is counted and the run continues.

use super::document_stream::{DocumentStream, TextDecoding};
use super::progress::ProgressReporter;
use super::stats::IngestStats;
use crate::app::models::NormalizedDocument;
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::document_store::{DocumentSink, InsertAck};
use crate::constants::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_COLLECTION, DEFAULT_INSERT_TIMEOUT_SECS};
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Settings for one indexing run
#[derive(Debug, Clone)]
pub struct IndexerOptions {
    pub collection: String,
    pub workers: usize,
    pub channel_capacity: usize,
    pub insert_timeout: Duration,
    /// Call `ensure_indexes` once before the first insert
    pub ensure_indexes: bool,
    /// Handling of files that are not valid UTF-8
    pub decoding: TextDecoding,
    pub show_progress: bool,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            workers: num_cpus::get(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            insert_timeout: Duration::from_secs(DEFAULT_INSERT_TIMEOUT_SECS),
            ensure_indexes: true,
            decoding: TextDecoding::Strict,
            show_progress: false,
        }
    }
}

impl IndexerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_insert_timeout(mut self, timeout: Duration) -> Self {
        self.insert_timeout = timeout;
        self
    }

    pub fn with_ensure_indexes(mut self, ensure: bool) -> Self {
        self.ensure_indexes = ensure;
        self
    }

    pub fn with_decoding(mut self, decoding: TextDecoding) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Drives discovery output through extraction into a sink
pub struct Indexer<S: DocumentSink> {
    sink: Arc<S>,
    extractor: DocumentExtractor,
    options: IndexerOptions,
}

impl<S: DocumentSink> Indexer<S> {
    pub fn new(sink: Arc<S>, extractor: DocumentExtractor, options: IndexerOptions) -> Self {
        Self {
            sink,
            extractor,
            options,
        }
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn options(&self) -> &IndexerOptions {
        &self.options
    }

    /// Index every file, returning run statistics
    ///
    /// Only index setup failures abort the run. Cancellation stops the
    /// workers and returns the statistics gathered so far with
    /// `interrupted` set.
    pub async fn run(
        &self,
        files: Vec<PathBuf>,
        cancellation_token: CancellationToken,
    ) -> Result<IngestStats> {
        let start = Instant::now();
        let mut stats = IngestStats::new(files.len());

        info!(
            "Indexing {} files into '{}' with {} workers",
            files.len(),
            self.options.collection,
            self.options.workers
        );

        if self.options.ensure_indexes {
            self.ensure_indexes().await?;
        }

        let progress =
            ProgressReporter::new(self.options.show_progress, files.len(), "Indexing messages");

        if !files.is_empty() {
            let mut stream = DocumentStream::with_decoding(
                files,
                self.extractor,
                self.options.workers,
                self.options.channel_capacity,
                cancellation_token.clone(),
                self.options.decoding,
            );

            while let Some(outcome) = stream.next_outcome().await {
                let stored = match outcome.result {
                    Ok(document) => self.store(&document).await.map(|ack| (ack, document)),
                    Err(e) => Err(e),
                };

                match stored {
                    Ok((ack, document)) => {
                        debug!(
                            "Indexed {} as {} ({})",
                            outcome.path.display(),
                            ack.inserted_id,
                            document.kind()
                        );
                        stats.record_indexed(document.kind(), document.is_registry_flagged());
                    }
                    Err(e) => {
                        error!("Failed to index {}: {}", outcome.path.display(), e);
                        stats.record_failure(&outcome.path, &e);
                    }
                }
                progress.file_done(&stats);
            }

            stats.worker_failures = stream.worker_failures();
        }

        stats.interrupted = cancellation_token.is_cancelled();
        stats.processing_time = start.elapsed();
        progress.finish(&stats);

        if stats.interrupted {
            warn!(
                "Indexing interrupted: {} of {} files processed",
                stats.files_processed(),
                stats.files_discovered
            );
        } else {
            info!(
                "Indexing complete: {} indexed, {} failed in {:.2}s",
                stats.files_indexed,
                stats.files_failed,
                stats.processing_time.as_secs_f64()
            );
        }

        Ok(stats)
    }

    /// One-time index setup, bounded by the insert timeout
    pub async fn ensure_indexes(&self) -> Result<()> {
        let seconds = self.options.insert_timeout.as_secs();
        tokio::time::timeout(self.options.insert_timeout, self.sink.ensure_indexes())
            .await
            .map_err(|_| Error::timeout("ensure indexes", seconds))?
    }

    /// Store one document under the per-document timeout
    pub async fn store(&self, document: &NormalizedDocument) -> Result<InsertAck> {
        let collection = &self.options.collection;
        let seconds = self.options.insert_timeout.as_secs();

        tokio::time::timeout(
            self.options.insert_timeout,
            self.sink.insert(collection, document),
        )
        .await
        .map_err(|_| Error::timeout(format!("insert into '{}'", collection), seconds))?
    }
}
