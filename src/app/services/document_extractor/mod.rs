//! Document extractor for parsed HL7 v2 messages
//!
//! Dispatches on the `TYPE^EVENT` pair of MSH-9 to a mapping routine per
//! supported message kind and falls back to a header/demographic-only
//! mapping for everything else.
//!
//! ## Architecture
//!
//! - [`extractor`] - [`DocumentExtractor`] entry point and kind resolution
//! - [`mappers`] - Dispatch table and the admit/order/fallback mappers
//! - [`results`] - Results-report correlation (orders, observations, impressions)
//! - [`projection`] - Header and demographic projection shared by all mappers
//! - [`field_parsers`] - Date, time and value-type coercion
//! - [`tumor_registry`] - Impression screening for hedging terms
//!
//! ## Usage
//!
//! ```rust
//! use hl7_indexer::DocumentExtractor;
//!
//! let text = "MSH|^~\\&|LAB|HOSP|||20230115||ADT^A01|42\rPID|1||P-1||DOE^JANE||19800214";
//! let document = DocumentExtractor::default().process(text);
//!
//! assert_eq!(document.control_id.as_deref(), Some("42"));
//! assert_eq!(document.patient.last_name.as_deref(), Some("DOE"));
//! assert_eq!(document.raw, text);
//! ```

pub mod extractor;
pub mod field_parsers;
pub mod mappers;
pub mod projection;
pub mod results;
pub mod tumor_registry;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use extractor::DocumentExtractor;
pub use mappers::{Mapper, MappingContext, mapper_for};
