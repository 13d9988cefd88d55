//! Per-kind mapping routines and the dispatch table
//!
//! Every mapper starts from [`base_document`] (shared header and
//! demographic projection, raw text, processing timestamp) and adds the
//! kind-specific sections.

use super::field_parsers::non_empty;
use super::projection::{project_header, project_patient};
use super::results::map_results_report;
use crate::app::models::{MessageKind, NormalizedDocument, Order, OrderRequest};
use crate::app::services::segment_parser::{ParsedMessage, Separators};
use crate::constants::{orc, segments};
use chrono::{DateTime, Utc};

/// Inputs shared by every mapping routine for one message
#[derive(Debug, Clone, Copy)]
pub struct MappingContext<'a> {
    pub message: &'a ParsedMessage,
    pub raw: &'a str,
    pub separators: Separators,
    pub processed_at: DateTime<Utc>,
}

/// Mapping routine signature
pub type Mapper = fn(&MappingContext<'_>) -> NormalizedDocument;

/// Look up the mapping routine for a message kind
pub fn mapper_for(kind: MessageKind) -> Mapper {
    match kind {
        MessageKind::AdmitNotification => map_admit_notification,
        MessageKind::OrderRequest => map_order_request,
        MessageKind::ResultsReport => map_results_report,
        MessageKind::Other => map_fallback,
    }
}

/// Shared header and demographic projection with empty kind-specific sections
pub fn base_document(ctx: &MappingContext<'_>) -> NormalizedDocument {
    let header = project_header(ctx.message);

    NormalizedDocument {
        message_type: header.message_type,
        event_type: header.event_type,
        control_id: header.control_id,
        sending: header.sending,
        receiving: header.receiving,
        timestamp: header.timestamp,
        patient: project_patient(ctx.message, ctx.separators),
        orders: Vec::new(),
        observations: Vec::new(),
        schedule: None,
        impressions: None,
        provider: None,
        tumor_registry: None,
        processed_at: ctx.processed_at,
        raw: ctx.raw.to_string(),
    }
}

/// Admit notifications carry only the shared projection
pub fn map_admit_notification(ctx: &MappingContext<'_>) -> NormalizedDocument {
    base_document(ctx)
}

/// Order requests add one order per ORC instance, or per OBR when no ORC exists
pub fn map_order_request(ctx: &MappingContext<'_>) -> NormalizedDocument {
    let mut document = base_document(ctx);

    let order_segments = if ctx.message.contains(segments::ORC) {
        ctx.message.segments(segments::ORC)
    } else {
        ctx.message.segments(segments::OBR)
    };

    // ORC and OBR share positions 2 and 3 for these two identifiers
    document.orders = order_segments
        .iter()
        .map(|segment| {
            Order::Request(OrderRequest {
                order_number: non_empty(segment.field(orc::ORDER_NUMBER)),
                placer_order: non_empty(segment.field(orc::PLACER_ORDER)),
            })
        })
        .collect();

    document
}

/// Unrecognized kinds carry only the shared projection
pub fn map_fallback(ctx: &MappingContext<'_>) -> NormalizedDocument {
    base_document(ctx)
}
