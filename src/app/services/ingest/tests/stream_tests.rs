//! Tests for the worker pool

use super::*;
use crate::Error;
use crate::app::models::MessageKind;
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::ingest::{
    DocumentStream, IngestOutcome, TextDecoding, read_message_file, read_message_text,
};
use futures::StreamExt;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

async fn collect(stream: DocumentStream) -> Vec<IngestOutcome> {
    stream.into_stream().collect().await
}

#[tokio::test]
async fn test_one_outcome_per_file() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());

    let stream = DocumentStream::new(
        files.clone(),
        DocumentExtractor::default(),
        2,
        4,
        CancellationToken::new(),
    );
    let mut outcomes = collect(stream).await;
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(outcomes.len(), 3);

    let results = outcomes[0].result.as_ref().unwrap();
    assert_eq!(results.kind(), MessageKind::ResultsReport);
    assert_eq!(results.raw, create_test_oru_message());

    let admit = outcomes[1].result.as_ref().unwrap();
    assert_eq!(admit.kind(), MessageKind::AdmitNotification);

    assert!(matches!(
        outcomes[2].result,
        Err(Error::InvalidEncoding { .. })
    ));
}

#[tokio::test]
async fn test_more_workers_than_files() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());

    let mut stream = DocumentStream::new(
        files[..1].to_vec(),
        DocumentExtractor::default(),
        16,
        1,
        CancellationToken::new(),
    );
    let outcome = stream.next_outcome().await.unwrap();
    assert!(outcome.result.is_ok());
    assert!(stream.next_outcome().await.is_none());
    assert_eq!(stream.worker_failures(), 0);
}

#[tokio::test]
async fn test_missing_file_is_scoped_failure() {
    let temp_dir = TempDir::new().unwrap();
    let mut files = create_test_inbox(temp_dir.path());
    files.push(temp_dir.path().join("vanished.hl7"));

    let outcomes = collect(DocumentStream::new(
        files,
        DocumentExtractor::default(),
        3,
        8,
        CancellationToken::new(),
    ))
    .await;

    assert_eq!(outcomes.len(), 4);
    let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
    assert_eq!(failures, 2);
}

#[tokio::test]
async fn test_cancelled_stream_ends_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());
    let token = CancellationToken::new();
    token.cancel();

    let mut stream = DocumentStream::new(files, DocumentExtractor::default(), 2, 4, token);
    assert!(stream.next_outcome().await.is_none());
}

#[tokio::test]
async fn test_read_message_file_preserves_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bom.hl7");
    let text = format!("\u{feff}{}\r\n", create_test_adt_message());
    std::fs::write(&path, &text).unwrap();

    assert_eq!(read_message_file(&path).await.unwrap(), text);
}

#[tokio::test]
async fn test_lossy_decoding_indexes_latin1_file() {
    let temp_dir = TempDir::new().unwrap();
    let files = create_test_inbox(temp_dir.path());

    let outcomes = collect(DocumentStream::with_decoding(
        files,
        DocumentExtractor::default(),
        2,
        4,
        CancellationToken::new(),
        TextDecoding::Lossy,
    ))
    .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
}

#[tokio::test]
async fn test_read_message_text_modes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("latin1.hl7");
    // PID name "MU\xd1OZ" in ISO-8859-1
    let mut bytes = b"MSH|^~\\&|||||||ADT^A01|L1\rPID|1||P1||MU".to_vec();
    bytes.push(0xd1);
    bytes.extend_from_slice(b"OZ^ANA");
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        read_message_text(&path, TextDecoding::Strict).await,
        Err(Error::InvalidEncoding { .. })
    ));

    let text = read_message_text(&path, TextDecoding::Lossy).await.unwrap();
    assert!(text.ends_with("MU\u{fffd}OZ^ANA"));

    let document = DocumentExtractor::default().process(&text);
    assert_eq!(document.control_id.as_deref(), Some("L1"));
    assert_eq!(document.patient.first_name.as_deref(), Some("ANA"));
}
