//! Tests for document sinks


use crate::DocumentExtractor;
use crate::app::models::NormalizedDocument;

/// Results document with a flagged impression
pub fn create_test_document() -> NormalizedDocument {
    DocumentExtractor::default().process(
        &crate::app::services::segment_parser::tests::create_test_oru_message(),
    )
}
