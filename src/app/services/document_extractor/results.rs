//! Results-report mapping
//!
//! Correlates OBR order details, OBX observations, impressions, the first
//! SCH schedule and the first ORC ordering provider into one document.

use super::field_parsers::{coerce_value, non_empty, parse_date_time_utc};
use super::mappers::{MappingContext, base_document};
use super::tumor_registry;
use crate::app::models::{
    NormalizedDocument, Observation, ObservationGroup, Order, Provider, ResultOrder, Schedule,
    ServiceDescriptor,
};
use crate::app::services::segment_parser::{ParsedMessage, Segment};
use crate::constants::{IMPRESSION_MARKER, obr, obx, orc, pid, sch, segments};
use indexmap::IndexMap;
use tracing::debug;

/// Map a results report (ORU^R01)
pub fn map_results_report(ctx: &MappingContext<'_>) -> NormalizedDocument {
    let mut document = base_document(ctx);
    let message = ctx.message;

    if let Some(patient) = message.first(segments::PID) {
        document.patient.mrn = non_empty(patient.field(pid::MEDICAL_RECORD_NUMBER));
        document.patient.gender = non_empty(patient.field(pid::SEX));
    }

    document.orders = message
        .segments(segments::OBR)
        .iter()
        .map(|segment| Order::Result(result_order(segment)))
        .collect();

    let observations = extract_observations(message);
    document.observations = group_observations(observations);

    let impressions = extract_impressions(message);
    document.tumor_registry = Some(tumor_registry::screen(&impressions));
    document.impressions = Some(impressions);

    document.schedule = message.first(segments::SCH).map(schedule);
    document.provider = message.first(segments::ORC).and_then(ordering_provider);

    debug!(
        "Mapped results report: {} orders, {} observation groups",
        document.orders.len(),
        document.observations.len()
    );

    document
}

/// Order detail from one OBR instance
pub fn result_order(segment: &Segment) -> ResultOrder {
    ResultOrder {
        set_id: non_empty(segment.field(obr::SET_ID)),
        placer_order_number: non_empty(segment.field(obr::PLACER_ORDER_NUMBER)),
        filler_order_number: non_empty(segment.field(obr::FILLER_ORDER_NUMBER)),
        service: ServiceDescriptor {
            code: non_empty(segment.component(obr::UNIVERSAL_SERVICE_ID, 1)),
            text: non_empty(segment.component(obr::UNIVERSAL_SERVICE_ID, 2)),
            coding_system: non_empty(segment.component(obr::UNIVERSAL_SERVICE_ID, 3)),
        },
        raw_fields: segment.raw_fields().to_vec(),
    }
}

/// One observation per OBX instance, values coerced by value type
pub fn extract_observations(message: &ParsedMessage) -> Vec<Observation> {
    message
        .segments(segments::OBX)
        .iter()
        .map(|segment| Observation {
            code: non_empty(segment.component(obx::OBSERVATION_IDENTIFIER, 1)),
            value: segment
                .field(obx::OBSERVATION_VALUE)
                .map(|value| coerce_value(segment.field(obx::VALUE_TYPE), value)),
            units: non_empty(segment.field(obx::UNITS)),
        })
        .collect()
}

/// Fold observations into one group per code
///
/// Groups appear in order of first occurrence; values keep source order.
/// Units are the last non-null units seen for the code.
pub fn group_observations(observations: Vec<Observation>) -> Vec<ObservationGroup> {
    let mut groups: IndexMap<Option<String>, ObservationGroup> = IndexMap::new();

    for observation in observations {
        let group = groups
            .entry(observation.code.clone())
            .or_insert_with(|| ObservationGroup {
                code: observation.code.clone(),
                values: Vec::new(),
                units: None,
            });

        group.values.push(observation.value);
        if observation.units.is_some() {
            group.units = observation.units;
        }
    }

    groups.into_values().collect()
}

/// Values of OBX instances whose identifier text is the impression marker
pub fn extract_impressions(message: &ParsedMessage) -> Vec<Option<String>> {
    message
        .segments(segments::OBX)
        .iter()
        .filter(|segment| {
            segment
                .component(obx::OBSERVATION_IDENTIFIER, 2)
                .is_some_and(|text| text.eq_ignore_ascii_case(IMPRESSION_MARKER))
        })
        .map(|segment| non_empty(segment.field(obx::OBSERVATION_VALUE)))
        .collect()
}

fn schedule(segment: &Segment) -> Schedule {
    Schedule {
        id: non_empty(segment.field(sch::PLACER_APPOINTMENT_ID)),
        start_time: parse_date_time_utc(
            segment.field(sch::START_DATE),
            segment.field(sch::START_TIME),
        ),
        end_time: parse_date_time_utc(segment.field(sch::END_DATE), segment.field(sch::END_TIME)),
    }
}

/// Provider from ORC-12 (`id^last^first`), only when both names are present
fn ordering_provider(segment: &Segment) -> Option<Provider> {
    let last_name = segment.component(orc::ORDERING_PROVIDER, 2)?;
    let first_name = segment.component(orc::ORDERING_PROVIDER, 3)?;

    Some(Provider {
        id: non_empty(segment.component(orc::ORDERING_PROVIDER, 1)),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
    })
}
