//! Test utilities for document extractor testing

mod extractor_tests;

pub use crate::app::services::segment_parser::tests::{
    create_test_adt_message, create_test_oru_message,
};

/// Results message with scheduling and ordering-provider segments
pub fn create_test_scheduled_oru_message() -> String {
    [
        "MSH|^~\\&|LAB|HOSP|EHR|CLINIC|20230301||ORU^R01|SCH-1|P|2.5",
        "PID|1||P-100|MRN-100|ROE^RICHARD||19651231|M",
        "ORC|RE|ORD-9|PLC-9|||||||||1234^WELBY^MARCUS",
        "OBR|1|PLC-9|FIL-9|GLU^Glucose^LN",
        "OBX|1|NM|GLU^Glucose^LN||N/A|mg/dL",
        "OBX|2|NM|GLU^Glucose^LN||105|mg/dL",
        "OBX|3|ST|HGB^Hemoglobin^LN||13.5|g/dL",
        "SCH||APPT-1||||||20230301|0930|20230301|10:15:30",
    ]
    .join("\r\n")
}
