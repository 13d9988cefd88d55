//! Core data structures for normalized clinical documents
//!
//! Defines the document produced for every input message together with its
//! sub-records (patient, orders, grouped observations, schedule, provider,
//! tumor-registry screening). Every field that comes from message text is
//! optional: absence in the source becomes `null` in the document.
//!
//! Documents serialize with camelCase keys so that index definitions such
//! as `patient.id` and `processedAt` address them directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message kinds with a dedicated mapping routine
///
/// Anything not listed maps through [`MessageKind::Other`], which only
/// projects the shared header and demographic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Admit/visit notification (ADT^A01)
    AdmitNotification,
    /// General order message (ORM^O01)
    OrderRequest,
    /// Unsolicited observation result (ORU^R01)
    ResultsReport,
    /// Any other or missing message type
    Other,
}

impl MessageKind {
    /// Every kind, in dispatch-table order
    pub const ALL: [MessageKind; 4] = [
        MessageKind::AdmitNotification,
        MessageKind::OrderRequest,
        MessageKind::ResultsReport,
        MessageKind::Other,
    ];

    /// Resolve the kind from the message type and trigger event components
    pub fn from_dispatch(message_type: Option<&str>, event_type: Option<&str>) -> Self {
        match (message_type, event_type) {
            (Some("ADT"), Some("A01")) => MessageKind::AdmitNotification,
            (Some("ORM"), Some("O01")) => MessageKind::OrderRequest,
            (Some("ORU"), Some("R01")) => MessageKind::ResultsReport,
            _ => MessageKind::Other,
        }
    }

    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::AdmitNotification => "ADT^A01",
            MessageKind::OrderRequest => "ORM^O01",
            MessageKind::ResultsReport => "ORU^R01",
            MessageKind::Other => "other",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Application/facility pair from the message header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub application: Option<String>,
    pub facility: Option<String>,
}

/// Patient demographics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Option<String>,
    /// Full name field as it appears in the message (`last^first`)
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Medical record number, populated for results messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrn: Option<String>,
}

/// Order entry from an order-request message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_number: Option<String>,
    pub placer_order: Option<String>,
}

/// Coded service descriptor (`code^text^coding system`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub code: Option<String>,
    pub text: Option<String>,
    pub coding_system: Option<String>,
}

/// Order detail from a results message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOrder {
    pub set_id: Option<String>,
    pub placer_order_number: Option<String>,
    pub filler_order_number: Option<String>,
    pub service: ServiceDescriptor,
    /// Every field of the source segment, kept for traceability
    pub raw_fields: Vec<String>,
}

/// Order entry, shaped by the message kind that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Order {
    Result(ResultOrder),
    Request(OrderRequest),
}

/// Observation value after value-type coercion
///
/// Numeric observations that fail to convert keep their original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Number(f64),
    Text(String),
}

impl ObservationValue {
    /// Numeric value, if coercion succeeded
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ObservationValue::Number(value) => Some(*value),
            ObservationValue::Text(_) => None,
        }
    }

    /// Text value, if the observation was not coerced
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ObservationValue::Number(_) => None,
            ObservationValue::Text(value) => Some(value),
        }
    }
}

/// Single observation before grouping
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub code: Option<String>,
    pub value: Option<ObservationValue>,
    pub units: Option<String>,
}

/// All observations sharing a code, values in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationGroup {
    pub code: Option<String>,
    pub values: Vec<Option<ObservationValue>>,
    pub units: Option<String>,
}

/// Scheduling window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Ordering provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Option<String>,
    pub last_name: String,
    pub first_name: String,
}

/// Outcome of screening impressions for tumor-registry hedging terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorRegistryFlag {
    pub flagged: bool,
    pub matched_terms: Vec<String>,
}

/// Normalized document produced for one input message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDocument {
    pub message_type: Option<String>,
    pub event_type: Option<String>,
    pub control_id: Option<String>,
    pub sending: Endpoint,
    pub receiving: Endpoint,
    pub timestamp: Option<DateTime<Utc>>,
    pub patient: Patient,
    pub orders: Vec<Order>,
    pub observations: Vec<ObservationGroup>,
    pub schedule: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_registry: Option<TumorRegistryFlag>,
    pub processed_at: DateTime<Utc>,
    /// Source text exactly as received
    pub raw: String,
}

impl NormalizedDocument {
    /// Dispatch kind of this document
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_dispatch(self.message_type.as_deref(), self.event_type.as_deref())
    }

    /// Whether tumor-registry screening flagged this document
    pub fn is_registry_flagged(&self) -> bool {
        self.tumor_registry
            .as_ref()
            .is_some_and(|registry| registry.flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_dispatch() {
        assert_eq!(
            MessageKind::from_dispatch(Some("ADT"), Some("A01")),
            MessageKind::AdmitNotification
        );
        assert_eq!(
            MessageKind::from_dispatch(Some("ORM"), Some("O01")),
            MessageKind::OrderRequest
        );
        assert_eq!(
            MessageKind::from_dispatch(Some("ORU"), Some("R01")),
            MessageKind::ResultsReport
        );
        assert_eq!(
            MessageKind::from_dispatch(Some("ADT"), Some("A08")),
            MessageKind::Other
        );
        assert_eq!(MessageKind::from_dispatch(None, None), MessageKind::Other);
        assert_eq!(
            MessageKind::from_dispatch(None, Some("R01")),
            MessageKind::Other
        );
    }

    #[test]
    fn test_observation_value_serialization() {
        let number = serde_json::to_value(ObservationValue::Number(98.6)).unwrap();
        assert_eq!(number, serde_json::json!(98.6));

        let text = serde_json::to_value(ObservationValue::Text("N/A".into())).unwrap();
        assert_eq!(text, serde_json::json!("N/A"));
    }

    #[test]
    fn test_patient_optional_fields_omitted() {
        let patient = Patient {
            id: Some("123".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patient).unwrap();

        assert_eq!(json["id"], "123");
        assert!(json["firstName"].is_null());
        assert!(json.get("firstName").is_some());
        assert!(json.get("gender").is_none());
        assert!(json.get("mrn").is_none());
    }

    #[test]
    fn test_order_shapes_serialize_untagged() {
        let request = Order::Request(OrderRequest {
            order_number: Some("ORD-1".into()),
            placer_order: None,
        });
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["orderNumber"], "ORD-1");
        assert!(json["placerOrder"].is_null());
    }
}
