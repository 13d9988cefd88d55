//! Segment parser for pipe-delimited HL7 v2 message text
//!
//! Turns raw message text into an ordered, multi-valued mapping from segment
//! identifier to the segment instances that carried it. The parser is a
//! total function: malformed lines are accepted as-is and missing structure
//! shows up as absence in the result, never as an error.
//!
//! ## Architecture
//!
//! - [`parser`] - Line splitting and segment assembly
//! - [`message`] - [`ParsedMessage`] and [`Segment`] with field accessors
//!
//! ## Usage
//!
//! ```rust
//! use hl7_indexer::app::services::segment_parser::SegmentParser;
//!
//! let parser = SegmentParser::default();
//! let message = parser.parse("MSH|^~\\&|LAB|HOSP\rPID|1||12345");
//!
//! assert_eq!(message.first("PID").and_then(|pid| pid.field(3)), Some("12345"));
//! ```

pub mod message;
pub mod parser;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use message::{ParsedMessage, Segment};
pub use parser::{SegmentParser, Separators};
