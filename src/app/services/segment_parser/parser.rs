//! Core segment parser implementation
//!
//! Handles byte-order-mark removal, line splitting across the three common
//! line-ending conventions, and assembly of segment instances.

use super::message::{ParsedMessage, Segment};
use crate::constants::{BYTE_ORDER_MARK, DEFAULT_COMPONENT_SEPARATOR, DEFAULT_FIELD_SEPARATOR};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Field and component separators used for a whole document
///
/// Separators are fixed per run; they are never redefined from the header
/// segment of an individual message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Separators {
    pub field: char,
    pub component: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD_SEPARATOR,
            component: DEFAULT_COMPONENT_SEPARATOR,
        }
    }
}

impl Separators {
    /// Create separators from explicit characters
    pub fn new(field: char, component: char) -> Self {
        Self { field, component }
    }
}

/// Parser turning raw message text into a [`ParsedMessage`]
///
/// Stateless apart from its separators, so one instance can be shared
/// across any number of concurrent calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentParser {
    separators: Separators,
}

impl SegmentParser {
    /// Create a parser with explicit separators
    pub fn new(separators: Separators) -> Self {
        Self { separators }
    }

    /// Separators this parser splits on
    pub fn separators(&self) -> Separators {
        self.separators
    }

    /// Parse message text into ordered segments
    ///
    /// Never fails: empty or whitespace-only lines are skipped and any
    /// other line becomes a segment instance keyed by its leading token,
    /// whether or not that token is a known segment type.
    pub fn parse(&self, text: &str) -> ParsedMessage {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        let mut message = ParsedMessage::new();

        for line in split_lines(text) {
            let mut tokens = line.split(self.separators.field);
            // split always yields at least one token
            let id = tokens.next().unwrap_or_default();
            let fields: Vec<String> = tokens.map(str::to_string).collect();

            trace!("Segment {} with {} fields", id, fields.len());
            message.push(Segment::new(id, fields, self.separators));
        }

        debug!(
            "Parsed {} segment instances across {} segment types",
            message.segment_count(),
            message.len()
        );

        message
    }
}

/// Split text on `\r\n`, `\r` or `\n`, dropping empty and whitespace-only lines
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
}
