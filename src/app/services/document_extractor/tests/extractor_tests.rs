//! Tests for dispatch, shared projection and raw-text retention

use super::*;
use crate::app::models::MessageKind;
use crate::app::services::document_extractor::DocumentExtractor;
use crate::app::services::segment_parser::{SegmentParser, Separators};
use chrono::{NaiveDate, Utc};

#[test]
fn test_classify_supported_kinds() {
    let extractor = DocumentExtractor::default();
    let parser = SegmentParser::default();

    let cases = [
        ("MSH|^~\\&|||||||ADT^A01|1", MessageKind::AdmitNotification),
        ("MSH|^~\\&|||||||ORM^O01|1", MessageKind::OrderRequest),
        ("MSH|^~\\&|||||||ORU^R01|1", MessageKind::ResultsReport),
        ("MSH|^~\\&|||||||ADT^A08|1", MessageKind::Other),
        ("MSH|^~\\&|||||||ORU|1", MessageKind::Other),
        ("PID|1||X", MessageKind::Other),
    ];

    for (text, expected) in cases {
        assert_eq!(extractor.classify(&parser.parse(text)), expected, "{text}");
    }
}

#[test]
fn test_missing_header_uses_fallback_with_nulls() {
    let text = "OBX|1|NM|GLU^Glucose||5.4|mmol/L\rORC|NW|ORD-1";
    let document = DocumentExtractor::default().process(text);

    assert_eq!(document.kind(), MessageKind::Other);
    assert_eq!(document.message_type, None);
    assert_eq!(document.event_type, None);
    assert_eq!(document.control_id, None);
    assert_eq!(document.sending.application, None);
    assert_eq!(document.receiving.facility, None);
    assert_eq!(document.timestamp, None);
    assert_eq!(document.patient.id, None);
    assert_eq!(document.patient.name, None);
    assert_eq!(document.patient.dob, None);
    assert!(document.orders.is_empty());
    assert!(document.observations.is_empty());
    assert!(document.schedule.is_none());
}

#[test]
fn test_admit_notification_projection() {
    let text = create_test_adt_message();
    let document = DocumentExtractor::default().process(&text);

    assert_eq!(document.kind(), MessageKind::AdmitNotification);
    assert_eq!(document.control_id.as_deref(), Some("CTRL42"));
    assert_eq!(document.sending.application.as_deref(), Some("ADT"));
    assert_eq!(document.receiving.application.as_deref(), Some("EHR"));
    assert_eq!(document.patient.id.as_deref(), Some("PAT-9"));
    assert_eq!(document.patient.first_name.as_deref(), Some("JOHN"));
    assert_eq!(document.patient.last_name.as_deref(), Some("SMITH"));
    assert_eq!(document.patient.dob, NaiveDate::from_ymd_opt(1970, 1, 1));
    assert_eq!(document.patient.gender, None);
    assert!(document.orders.is_empty());
    assert!(document.provider.is_none());
}

#[test]
fn test_raw_text_retained_byte_for_byte() {
    let inputs = [
        create_test_oru_message(),
        create_test_adt_message(),
        format!("\u{feff}{}\r\n\r\n", create_test_adt_message()),
        "  garbage | with ^ odd \u{e9} text  ".to_string(),
        String::new(),
    ];

    let extractor = DocumentExtractor::default();
    for input in inputs {
        let document = extractor.process(&input);
        assert_eq!(document.raw.as_bytes(), input.as_bytes());
    }
}

#[test]
fn test_processed_at_stamped_at_call_time() {
    let before = Utc::now();
    let document = DocumentExtractor::default().process(&create_test_adt_message());
    let after = Utc::now();

    assert!(document.processed_at >= before);
    assert!(document.processed_at <= after);
}

#[test]
fn test_extract_arbitrary_text_never_panics() {
    let extractor = DocumentExtractor::default();
    for text in ["|||", "MSH", "MSH|", "MSH|^~\\&|||||||^", "PID", "OBX||NM", "\r\r\n"] {
        let document = extractor.process(text);
        assert_eq!(document.raw, text);
    }
}

#[test]
fn test_custom_separators() {
    let extractor = DocumentExtractor::new(Separators::new('#', '~'));
    let text = "MSH#x#LAB#HOSP#####ADT~A01#77\rPID#1##P-1##DOE~JANE##19800214";

    let document = extractor.process(text);

    assert_eq!(document.kind(), MessageKind::AdmitNotification);
    assert_eq!(document.control_id.as_deref(), Some("77"));
    assert_eq!(document.patient.last_name.as_deref(), Some("DOE"));
    assert_eq!(document.patient.first_name.as_deref(), Some("JANE"));
}

#[test]
fn test_document_serializes_with_camel_case_keys() {
    let document = DocumentExtractor::default().process(&create_test_oru_message());
    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["messageType"], "ORU");
    assert_eq!(json["eventType"], "R01");
    assert_eq!(json["controlId"], "MSG00001");
    assert_eq!(json["patient"]["firstName"], "JANE");
    assert_eq!(json["patient"]["dob"], "1980-02-14");
    assert_eq!(json["tumorRegistry"]["matchedTerms"][0], "consistent with");
    assert!(json["processedAt"].is_string());
    assert_eq!(json["raw"], create_test_oru_message());
}
