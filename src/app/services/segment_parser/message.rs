//! Parsed message structure and field accessors
//!
//! Field accessors use standard 1-based HL7 field numbers and treat empty
//! strings as absent, so every extraction point handles "field missing"
//! through `Option` rather than through string checks.

use super::parser::Separators;
use crate::constants::segments;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// One occurrence of a segment in the source text
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: String,
    fields: Vec<String>,
    separators: Separators,
}

impl Segment {
    /// Create a segment instance from its identifier and the tokens after it
    pub fn new(id: impl Into<String>, fields: Vec<String>, separators: Separators) -> Self {
        Self {
            id: id.into(),
            fields,
            separators,
        }
    }

    /// Segment identifier (leading token of the line)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw field tokens in source order, identifier excluded
    pub fn raw_fields(&self) -> &[String] {
        &self.fields
    }

    /// Separators the segment was split with
    pub fn separators(&self) -> Separators {
        self.separators
    }

    /// Get a field by its HL7 field number
    ///
    /// Returns `None` for field 0, for positions past the end of the
    /// segment, and for empty fields. The header segment is offset by one
    /// because its first field is the field separator itself.
    pub fn field(&self, number: usize) -> Option<&str> {
        let index = self.field_index(number)?;
        self.fields
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Split a field into its components
    ///
    /// An absent field yields an empty list.
    pub fn components(&self, number: usize) -> Vec<&str> {
        self.field(number)
            .map(|value| value.split(self.separators.component).collect())
            .unwrap_or_default()
    }

    /// Get one component (1-based) of a field, treating empty as absent
    pub fn component(&self, number: usize, component: usize) -> Option<&str> {
        let index = component.checked_sub(1)?;
        self.field(number)?
            .split(self.separators.component)
            .nth(index)
            .filter(|value| !value.is_empty())
    }

    fn field_index(&self, number: usize) -> Option<usize> {
        if self.id == segments::MSH {
            number.checked_sub(2)
        } else {
            number.checked_sub(1)
        }
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Ordered mapping from segment identifier to its instances
///
/// Keys appear in the order their first instance appeared; instances under
/// a key keep source order. Absent segments have no key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedMessage {
    segments: IndexMap<String, Vec<Segment>>,
}

impl ParsedMessage {
    /// Create an empty parsed message
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment instance under its identifier
    pub fn push(&mut self, segment: Segment) {
        self.segments
            .entry(segment.id.clone())
            .or_default()
            .push(segment);
    }

    /// All instances of a segment, empty when the segment is absent
    pub fn segments(&self, id: &str) -> &[Segment] {
        self.segments.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// First instance of a segment
    pub fn first(&self, id: &str) -> Option<&Segment> {
        self.segments(id).first()
    }

    /// Check whether at least one instance of a segment is present
    pub fn contains(&self, id: &str) -> bool {
        self.segments.contains_key(id)
    }

    /// Segment identifiers in order of first appearance
    pub fn segment_ids(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    /// Number of distinct segment identifiers
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Total number of segment instances
    pub fn segment_count(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    /// Whether no segments were parsed
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
