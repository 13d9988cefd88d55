//! Document extractor entry point

use super::mappers::{MappingContext, mapper_for};
use super::projection::dispatch_components;
use crate::app::models::{MessageKind, NormalizedDocument};
use crate::app::services::segment_parser::{ParsedMessage, SegmentParser, Separators};
use crate::constants::segments;
use chrono::Utc;
use tracing::debug;

/// Turns parsed messages into normalized documents
///
/// Extraction is a total function: any missing or malformed field becomes
/// a null or empty value in the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor {
    separators: Separators,
}

impl DocumentExtractor {
    /// Create an extractor for messages using the given separators
    pub fn new(separators: Separators) -> Self {
        Self { separators }
    }

    /// Separators this extractor was configured with
    pub fn separators(&self) -> Separators {
        self.separators
    }

    /// Resolve the dispatch kind from the first MSH instance
    pub fn classify(&self, message: &ParsedMessage) -> MessageKind {
        let Some(header) = message.first(segments::MSH) else {
            return MessageKind::Other;
        };
        let (message_type, event_type) = dispatch_components(header);
        MessageKind::from_dispatch(message_type.as_deref(), event_type.as_deref())
    }

    /// Extract a normalized document, attaching `raw` verbatim
    pub fn extract(&self, message: &ParsedMessage, raw: &str) -> NormalizedDocument {
        let kind = self.classify(message);
        debug!(
            "Extracting {} document from {} segments",
            kind,
            message.segment_count()
        );

        let ctx = MappingContext {
            message,
            raw,
            separators: self.separators,
            processed_at: Utc::now(),
        };
        mapper_for(kind)(&ctx)
    }

    /// Parse and extract in one step
    pub fn process(&self, text: &str) -> NormalizedDocument {
        let message = SegmentParser::new(self.separators).parse(text);
        self.extract(&message, text)
    }
}
