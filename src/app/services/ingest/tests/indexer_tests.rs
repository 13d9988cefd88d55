//! Tests for the indexing coordinator

use super::*;
use crate::Error;
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::document_store::{JsonLinesStore, MemoryStore};
use crate::app::services::ingest::{Indexer, IndexerOptions, TextDecoding};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn options() -> IndexerOptions {
    IndexerOptions::new()
        .with_workers(2)
        .with_channel_capacity(2)
        .with_insert_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_batch_continues_past_failed_file() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let store = Arc::new(MemoryStore::new());

    let indexer = Indexer::new(Arc::clone(&store), DocumentExtractor::default(), options());
    let stats = indexer.run(files, CancellationToken::new()).await.unwrap();

    assert_eq!(stats.files_discovered, 3);
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.files_failed, 1);
    assert!(stats.failures[0].file.ends_with("03_binary.hl7"));
    assert_eq!(stats.registry_flagged, 1);
    assert_eq!(stats.documents_by_kind["ORU^R01"], 1);
    assert_eq!(stats.documents_by_kind["ADT^A01"], 1);
    assert!(!stats.interrupted);

    assert_eq!(store.count("messages").await, 2);
    assert_eq!(store.ensured_indexes().await.len(), 3);
}

#[tokio::test]
async fn test_insert_failure_is_scoped_to_document() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let sink = Arc::new(RejectingSink::new("CTRL42"));

    let indexer = Indexer::new(Arc::clone(&sink), DocumentExtractor::default(), options());
    let stats = indexer.run(files, CancellationToken::new()).await.unwrap();

    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.files_failed, 2);
    assert_eq!(sink.inserted.load(Ordering::SeqCst), 1);
    assert_eq!(sink.ensured.load(Ordering::SeqCst), 1);
    assert!(
        stats
            .failures
            .iter()
            .any(|f| f.error == "Storage error: document rejected")
    );
}

#[tokio::test]
async fn test_skip_indexes() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let sink = Arc::new(RejectingSink::new("none"));

    let indexer = Indexer::new(
        Arc::clone(&sink),
        DocumentExtractor::default(),
        options().with_ensure_indexes(false),
    );
    indexer.run(files, CancellationToken::new()).await.unwrap();

    assert_eq!(sink.ensured.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_insert_timeout_counts_as_failure() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let sink = Arc::new(StalledSink {
        delay: Duration::from_secs(60),
    });

    let indexer = Indexer::new(
        sink,
        DocumentExtractor::default(),
        options().with_insert_timeout(Duration::from_millis(20)),
    );
    let stats = indexer.run(files, CancellationToken::new()).await.unwrap();

    assert_eq!(stats.files_indexed, 0);
    assert_eq!(stats.files_failed, 3);
    assert!(
        stats
            .failures
            .iter()
            .any(|f| f.error.starts_with("Operation timed out"))
    );
}

#[tokio::test]
async fn test_store_reports_timeout_error() {
    let sink = Arc::new(StalledSink {
        delay: Duration::from_secs(60),
    });
    let indexer = Indexer::new(
        sink,
        DocumentExtractor::default(),
        options().with_insert_timeout(Duration::from_millis(10)),
    );
    let document = DocumentExtractor::default().process(&create_test_adt_message());

    let result = indexer.store(&document).await;
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

#[tokio::test]
async fn test_cancelled_run_reports_interruption() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let token = CancellationToken::new();
    token.cancel();

    let indexer = Indexer::new(
        Arc::new(MemoryStore::new()),
        DocumentExtractor::default(),
        options(),
    );
    let stats = indexer.run(files, token).await.unwrap();

    assert!(stats.interrupted);
    assert_eq!(stats.files_processed(), 0);
    assert_eq!(stats.files_skipped(), 3);
}

#[tokio::test]
async fn test_empty_input_still_ensures_indexes() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonLinesStore::new(temp_dir.path().join("out")));

    let indexer = Indexer::new(Arc::clone(&store), DocumentExtractor::default(), options());
    let stats = indexer
        .run(Vec::new(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stats.files_discovered, 0);
    assert!(store.manifest_path().exists());
    assert!(!store.collection_path("messages").exists());
}

#[tokio::test]
async fn test_json_lines_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let inbox = temp_dir.path().join("inbox");
    std::fs::create_dir(&inbox).unwrap();
    let files = create_test_inbox(&inbox);
    let store = Arc::new(JsonLinesStore::new(temp_dir.path().join("out")));

    let indexer = Indexer::new(
        Arc::clone(&store),
        DocumentExtractor::default(),
        options().with_collection("hl7"),
    );
    let stats = indexer.run(files, CancellationToken::new()).await.unwrap();
    assert_eq!(stats.files_indexed, 2);

    let contents = std::fs::read_to_string(store.collection_path("hl7")).unwrap();
    let raws: Vec<String> = contents
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["raw"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(raws.len(), 2);
    assert!(raws.contains(&create_test_oru_message()));
    assert!(raws.contains(&create_test_adt_message()));
}

#[tokio::test]
async fn test_lossy_run_indexes_every_file() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let store = Arc::new(MemoryStore::new());

    let indexer = Indexer::new(
        Arc::clone(&store),
        DocumentExtractor::default(),
        options().with_decoding(TextDecoding::Lossy),
    );
    let stats = indexer.run(files, CancellationToken::new()).await.unwrap();

    assert_eq!(stats.files_indexed, 3);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(store.count("messages").await, 3);
}
