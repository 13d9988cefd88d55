//! Application constants for the HL7 indexer
//!
//! This module contains segment identifiers, field positions, dispatch
//! markers, default values and the tumor-registry vocabulary used
//! throughout the indexer.

// =============================================================================
// Separators
// =============================================================================

/// Conventional field separator
pub const DEFAULT_FIELD_SEPARATOR: char = '|';

/// Conventional component separator
pub const DEFAULT_COMPONENT_SEPARATOR: char = '^';

/// Unicode byte-order marker stripped from the start of message text
pub const BYTE_ORDER_MARK: char = '\u{feff}';

// =============================================================================
// Segment Identifiers
// =============================================================================

/// Segment identifiers referenced by the extractor
pub mod segments {
    /// Message header
    pub const MSH: &str = "MSH";
    /// Patient identification
    pub const PID: &str = "PID";
    /// Common order
    pub const ORC: &str = "ORC";
    /// Observation request (order detail)
    pub const OBR: &str = "OBR";
    /// Observation result
    pub const OBX: &str = "OBX";
    /// Scheduling activity information
    pub const SCH: &str = "SCH";
}

// =============================================================================
// Field Positions (standard 1-based HL7 numbering)
// =============================================================================

/// Message header (MSH) field positions
pub mod msh {
    pub const SENDING_APPLICATION: usize = 3;
    pub const SENDING_FACILITY: usize = 4;
    pub const RECEIVING_APPLICATION: usize = 5;
    pub const RECEIVING_FACILITY: usize = 6;
    pub const DATE_TIME: usize = 7;
    pub const MESSAGE_TYPE: usize = 9;
    pub const CONTROL_ID: usize = 10;
}

/// Patient identification (PID) field positions
pub mod pid {
    pub const PATIENT_ID: usize = 3;
    /// Alternate patient identifier, carried as the medical record number
    pub const MEDICAL_RECORD_NUMBER: usize = 4;
    pub const PATIENT_NAME: usize = 5;
    pub const DATE_OF_BIRTH: usize = 7;
    pub const SEX: usize = 8;
}

/// Common order (ORC) field positions
pub mod orc {
    pub const ORDER_NUMBER: usize = 2;
    pub const PLACER_ORDER: usize = 3;
    pub const ORDERING_PROVIDER: usize = 12;
}

/// Observation request (OBR) field positions
pub mod obr {
    pub const SET_ID: usize = 1;
    pub const PLACER_ORDER_NUMBER: usize = 2;
    pub const FILLER_ORDER_NUMBER: usize = 3;
    pub const UNIVERSAL_SERVICE_ID: usize = 4;
}

/// Observation result (OBX) field positions
pub mod obx {
    pub const VALUE_TYPE: usize = 2;
    pub const OBSERVATION_IDENTIFIER: usize = 3;
    pub const OBSERVATION_VALUE: usize = 5;
    pub const UNITS: usize = 6;
}

/// Scheduling activity (SCH) field positions
pub mod sch {
    pub const PLACER_APPOINTMENT_ID: usize = 2;
    pub const START_DATE: usize = 8;
    pub const START_TIME: usize = 9;
    pub const END_DATE: usize = 10;
    pub const END_TIME: usize = 11;
}

// =============================================================================
// Dispatch and Value Markers
// =============================================================================

/// Value-type marker for numeric observations
pub const NUMERIC_VALUE_TYPE: &str = "NM";

/// Observation identifier text marking a free-text impression
pub const IMPRESSION_MARKER: &str = "impression";

/// Diagnostic-hedging terms screened for in impression text
///
/// Matching reports terms in this order, not in text order.
pub const TUMOR_REGISTRY_TERMS: &[&str] = &[
    "apparent",
    "appears to",
    "comparable with",
    "compatible with",
    "consistent with",
    "favor",
    "malignant appearing",
    "most likely",
    "presumed",
    "probable",
    "suspect",
    "suspicious for",
    "typical of",
];

// =============================================================================
// Input Discovery
// =============================================================================

/// File patterns recognised as message files
pub const DEFAULT_FILE_PATTERNS: &[&str] = &["*.hl7", "*.txt"];

// =============================================================================
// Storage Defaults
// =============================================================================

/// Collection receiving normalized documents
pub const DEFAULT_COLLECTION: &str = "messages";

/// Default output directory for the JSON-lines store
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Index manifest written by `ensure_indexes`
pub const INDEX_MANIFEST_FILENAME: &str = "indexes.json";

/// File extension for collection files
pub const COLLECTION_FILE_EXTENSION: &str = "jsonl";

/// Expiry applied to the processing timestamp index
pub const DEFAULT_EXPIRE_AFTER_DAYS: u64 = 30;

/// Upper bound on the expiry window (100 years)
pub const MAX_EXPIRE_AFTER_DAYS: u64 = 36_500;

/// Per-document insert timeout
pub const DEFAULT_INSERT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Performance Defaults
// =============================================================================

/// Capacity of the channel between workers and the storage coordinator
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Upper bound on the worker pool size
pub const MAX_WORKERS: usize = 256;

// =============================================================================
// Environment and Config File
// =============================================================================

/// Environment variable names consulted during layered configuration
pub mod env_vars {
    pub const INPUT_PATH: &str = "HL7_INPUT_PATH";
    pub const OUTPUT_PATH: &str = "HL7_OUTPUT_PATH";
    pub const COLLECTION: &str = "HL7_COLLECTION";
    pub const WORKERS: &str = "HL7_WORKERS";
}

/// Application directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "hl7-indexer";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";
