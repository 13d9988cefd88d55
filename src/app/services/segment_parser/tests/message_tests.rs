//! Tests for field and component accessors

use super::*;
use crate::app::services::segment_parser::{Segment, SegmentParser, Separators};

#[test]
fn test_header_field_numbering_offset() {
    let message = SegmentParser::default().parse(&create_test_oru_message());
    let msh = message.first("MSH").unwrap();

    assert_eq!(msh.field(1), None);
    assert_eq!(msh.field(2), Some("^~\\&"));
    assert_eq!(msh.field(3), Some("LAB"));
    assert_eq!(msh.field(4), Some("GENERAL HOSPITAL"));
    assert_eq!(msh.field(7), Some("20230115083000"));
    assert_eq!(msh.field(9), Some("ORU^R01"));
    assert_eq!(msh.field(10), Some("MSG00001"));
}

#[test]
fn test_ordinary_field_numbering() {
    let message = SegmentParser::default().parse(&create_test_oru_message());
    let pid = message.first("PID").unwrap();

    assert_eq!(pid.field(0), None);
    assert_eq!(pid.field(1), Some("1"));
    assert_eq!(pid.field(2), None);
    assert_eq!(pid.field(3), Some("12345^^^HOSP^MR"));
    assert_eq!(pid.field(8), Some("F"));
    assert_eq!(pid.field(40), None);
}

#[test]
fn test_component_access() {
    let message = SegmentParser::default().parse(&create_test_oru_message());
    let obx = &message.segments("OBX")[2];

    assert_eq!(obx.component(3, 1), Some("IMP"));
    assert_eq!(obx.component(3, 2), Some("Impression"));
    assert_eq!(obx.component(3, 3), Some("L"));
    assert_eq!(obx.component(3, 4), None);
    assert_eq!(obx.component(3, 0), None);
    assert_eq!(obx.component(4, 1), None);
}

#[test]
fn test_empty_components_are_absent() {
    let segment = Segment::new(
        "PID",
        vec!["1".into(), "".into(), "12345^^^HOSP".into()],
        Separators::default(),
    );

    assert_eq!(segment.component(3, 2), None);
    assert_eq!(segment.component(3, 4), Some("HOSP"));
    assert_eq!(segment.components(3), vec!["12345", "", "", "HOSP"]);
    assert!(segment.components(2).is_empty());
}

#[test]
fn test_parsed_message_serializes_as_field_lists() {
    let message = SegmentParser::default().parse("PID|1||123\rOBX|1|NM\rOBX|2|ST");
    let json = serde_json::to_value(&message).unwrap();

    assert_eq!(json["PID"][0], serde_json::json!(["1", "", "123"]));
    assert_eq!(json["OBX"].as_array().unwrap().len(), 2);
    assert_eq!(json["OBX"][1][1], "ST");
}
