//! Header and demographic projection shared by every mapper
//!
//! Each projection reads the first instance of its segment and defaults
//! every value to `None` when the segment or field is absent.

use super::field_parsers::{non_empty, parse_date, parse_date_utc, split_pair};
use crate::app::models::{Endpoint, Patient};
use crate::app::services::segment_parser::{ParsedMessage, Segment, Separators};
use crate::constants::{msh, pid, segments};
use chrono::{DateTime, Utc};

/// Header values common to all normalized documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderProjection {
    pub message_type: Option<String>,
    pub event_type: Option<String>,
    pub control_id: Option<String>,
    pub sending: Endpoint,
    pub receiving: Endpoint,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Project the message header (first MSH instance)
pub fn project_header(message: &ParsedMessage) -> HeaderProjection {
    let Some(header) = message.first(segments::MSH) else {
        return HeaderProjection::default();
    };

    let (message_type, event_type) = dispatch_components(header);

    HeaderProjection {
        message_type,
        event_type,
        control_id: non_empty(header.field(msh::CONTROL_ID)),
        sending: Endpoint {
            application: non_empty(header.field(msh::SENDING_APPLICATION)),
            facility: non_empty(header.field(msh::SENDING_FACILITY)),
        },
        receiving: Endpoint {
            application: non_empty(header.field(msh::RECEIVING_APPLICATION)),
            facility: non_empty(header.field(msh::RECEIVING_FACILITY)),
        },
        timestamp: header.field(msh::DATE_TIME).and_then(parse_date_utc),
    }
}

/// Message type and trigger event from `TYPE^EVENT`
pub fn dispatch_components(header: &Segment) -> (Option<String>, Option<String>) {
    (
        non_empty(header.component(msh::MESSAGE_TYPE, 1)),
        non_empty(header.component(msh::MESSAGE_TYPE, 2)),
    )
}

/// Project patient demographics (first PID instance)
///
/// Gender and medical record number are left unset; results mapping adds
/// them.
pub fn project_patient(message: &ParsedMessage, separators: Separators) -> Patient {
    let Some(patient) = message.first(segments::PID) else {
        return Patient::default();
    };

    let name = patient.field(pid::PATIENT_NAME);
    let (last_name, first_name) = split_pair(name, separators.component);

    Patient {
        id: non_empty(patient.field(pid::PATIENT_ID)),
        name: non_empty(name),
        first_name,
        last_name,
        dob: patient.field(pid::DATE_OF_BIRTH).and_then(parse_date),
        gender: None,
        mrn: None,
    }
}
