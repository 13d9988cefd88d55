//! Test utilities for segment parser testing
//!
//! Shared message fixtures used across the parser test modules.

mod message_tests;

/// Results message with repeated observation segments, `\r` separated
pub fn create_test_oru_message() -> String {
    [
        "MSH|^~\\&|LAB|GENERAL HOSPITAL|EHR|CLINIC|20230115083000||ORU^R01|MSG00001|P|2.5",
        "PID|1||12345^^^HOSP^MR|MRN-778|DOE^JANE||19800214|F",
        "OBR|1|PLC-1|FIL-1|88304^Surgical pathology^CPT",
        "OBX|1|NM|8310-5^Body temperature^LN||98.6|degF|||||F",
        "OBX|2|NM|8310-5^Body temperature^LN||99.1|degF|||||F",
        "OBX|3|TX|IMP^Impression^L||Findings consistent with malignancy||||||F",
    ]
    .join("\r")
}

/// Minimal admit notification, `\n` separated
pub fn create_test_adt_message() -> String {
    [
        "MSH|^~\\&|ADT|HOSP|EHR|CLINIC|20230115||ADT^A01|CTRL42|P|2.3",
        "PID|1||PAT-9||SMITH^JOHN||19700101|M",
    ]
    .join("\n")
}
