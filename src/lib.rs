//! HL7 Indexer Library
//!
//! A Rust library for turning pipe-delimited HL7 v2 clinical messages into
//! normalized documents ready for storage and search.
//!
//! This library provides tools for:
//! - Parsing raw message text into an ordered segment/field structure
//! - Extracting normalized documents keyed by message type and trigger event
//! - Correlating results messages (orders, grouped observations, impressions)
//! - Screening impression text for tumor-registry hedging terms
//! - Indexing whole directories of messages with a bounded worker pool

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod document_extractor;
        pub mod document_store;
        pub mod file_discovery;
        pub mod ingest;
        pub mod segment_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{NormalizedDocument, ObservationValue, Patient};
pub use app::services::document_extractor::DocumentExtractor;
pub use app::services::segment_parser::{ParsedMessage, Segment, SegmentParser, Separators};
pub use config::Config;

/// Result type alias for the HL7 indexer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for indexing operations
///
/// Parsing and extraction never fail; these variants only cover the edges
/// of the pipeline (files, configuration, storage).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Message file is not valid UTF-8
    #[error("Invalid text encoding in file '{file}'")]
    InvalidEncoding {
        file: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Storage sink rejected or failed an operation
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Document or report serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Storage call did not complete in time
    #[error("Operation timed out after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Worker task failed outside normal file handling
    #[error("Worker failure: {message}")]
    Worker { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid encoding error for a message file
    pub fn invalid_encoding(file: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        Self::InvalidEncoding {
            file: file.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a worker failure error
    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::configuration("workers must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Configuration error: workers must be greater than 0"
        );

        let err = Error::timeout("insert into 'messages'", 30);
        assert_eq!(
            err.to_string(),
            "Operation timed out after 30s: insert into 'messages'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
