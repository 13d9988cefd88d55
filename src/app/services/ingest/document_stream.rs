//! Worker pool turning message files into normalized documents
//!
//! Workers pull paths from a shared queue, read each file and run parse +
//! extract on the blocking pool. Every file yields exactly one
//! [`IngestOutcome`] on a single bounded channel, so a failing file never
//! affects its siblings and the consumer sets the pace.

use crate::app::models::NormalizedDocument;
use crate::app::services::document_extractor::DocumentExtractor;
use crate::{Error, Result};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of processing one input file
#[derive(Debug)]
pub struct IngestOutcome {
    pub path: PathBuf,
    pub result: Result<NormalizedDocument>,
}

/// Handling of message files that are not valid UTF-8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoding {
    /// Fail the file with [`Error::InvalidEncoding`]
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD and index the message anyway
    Lossy,
}

type WorkQueue = Arc<Mutex<VecDeque<PathBuf>>>;

/// Parallel stream of per-file outcomes
pub struct DocumentStream {
    receiver: mpsc::Receiver<IngestOutcome>,
    workers: JoinSet<usize>,
    worker_failures: usize,
    cancellation_token: CancellationToken,
}

impl DocumentStream {
    /// Spawn `workers` tasks over `files`, rejecting non-UTF-8 files
    pub fn new(
        files: Vec<PathBuf>,
        extractor: DocumentExtractor,
        workers: usize,
        channel_capacity: usize,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self::with_decoding(
            files,
            extractor,
            workers,
            channel_capacity,
            cancellation_token,
            TextDecoding::Strict,
        )
    }

    /// Spawn `workers` tasks over `files` with an explicit decoding mode
    pub fn with_decoding(
        files: Vec<PathBuf>,
        extractor: DocumentExtractor,
        workers: usize,
        channel_capacity: usize,
        cancellation_token: CancellationToken,
        decoding: TextDecoding,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(channel_capacity.max(1));
        let queue: WorkQueue = Arc::new(Mutex::new(files.into_iter().collect()));
        let worker_count = workers.max(1);

        info!("Spawning {} message processing workers", worker_count);

        let mut join_set = JoinSet::new();
        for worker_id in 0..worker_count {
            join_set.spawn(worker_task(
                worker_id,
                Arc::clone(&queue),
                extractor,
                decoding,
                sender.clone(),
                cancellation_token.clone(),
            ));
        }

        Self {
            receiver,
            workers: join_set,
            worker_failures: 0,
            cancellation_token,
        }
    }

    /// Next outcome from any worker
    ///
    /// Returns `None` once every worker has finished and the channel is
    /// drained, or as soon as the run is cancelled.
    pub async fn next_outcome(&mut self) -> Option<IngestOutcome> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    debug!("Document stream cancelled");
                    return None;
                }
                outcome = self.receiver.recv() => {
                    if outcome.is_none() {
                        self.drain_workers().await;
                    }
                    return outcome;
                }
                joined = self.workers.join_next(), if !self.workers.is_empty() => {
                    if let Some(result) = joined {
                        self.record_worker_exit(result);
                    }
                }
            }
        }
    }

    /// Adapt into a [`Stream`] of outcomes for combinator-style consumers
    ///
    /// Worker failure counts are not observable through the adapter.
    pub fn into_stream(self) -> impl Stream<Item = IngestOutcome> {
        stream::unfold(self, |mut documents| async move {
            documents
                .next_outcome()
                .await
                .map(|outcome| (outcome, documents))
        })
    }

    /// Workers that panicked or were aborted
    pub fn worker_failures(&self) -> usize {
        self.worker_failures
    }

    async fn drain_workers(&mut self) {
        while let Some(result) = self.workers.join_next().await {
            self.record_worker_exit(result);
        }
    }

    fn record_worker_exit(&mut self, result: std::result::Result<usize, tokio::task::JoinError>) {
        match result {
            Ok(files) => debug!("Worker finished after {} files", files),
            Err(e) => {
                error!("Worker task failed: {}", e);
                self.worker_failures += 1;
            }
        }
    }
}

async fn worker_task(
    worker_id: usize,
    queue: WorkQueue,
    extractor: DocumentExtractor,
    decoding: TextDecoding,
    sender: mpsc::Sender<IngestOutcome>,
    cancellation_token: CancellationToken,
) -> usize {
    let mut files_processed = 0;
    debug!("Worker {} started", worker_id);

    loop {
        if cancellation_token.is_cancelled() {
            debug!("Worker {} cancelled", worker_id);
            break;
        }

        let Some(path) = queue.lock().await.pop_front() else {
            break;
        };

        debug!("Worker {} processing {}", worker_id, path.display());
        let result = process_file(&extractor, &path, decoding).await;
        files_processed += 1;

        if sender.send(IngestOutcome { path, result }).await.is_err() {
            debug!("Worker {} channel closed, stopping", worker_id);
            break;
        }
    }

    debug!("Worker {} completed {} files", worker_id, files_processed);
    files_processed
}

/// Read one message file and extract its document
pub async fn process_file(
    extractor: &DocumentExtractor,
    path: &Path,
    decoding: TextDecoding,
) -> Result<NormalizedDocument> {
    let text = read_message_text(path, decoding).await?;
    let extractor = *extractor;

    tokio::task::spawn_blocking(move || extractor.process(&text))
        .await
        .map_err(|e| {
            Error::worker(format!(
                "Extraction task failed for {}: {}",
                path.display(),
                e
            ))
        })
}

/// Read a message file as UTF-8 text, byte-for-byte
pub async fn read_message_file(path: &Path) -> Result<String> {
    read_message_text(path, TextDecoding::Strict).await
}

/// Read a message file, applying `decoding` to invalid UTF-8
pub async fn read_message_text(path: &Path, decoding: TextDecoding) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if decoding == TextDecoding::Lossy => {
            warn!(
                "{} is not valid UTF-8 (first bad byte at {}), decoding lossily",
                path.display(),
                e.utf8_error().valid_up_to()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
        Err(e) => Err(Error::invalid_encoding(path.display().to_string(), e)),
    }
}
