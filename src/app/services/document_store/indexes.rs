//! Index definitions for stored documents

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Key ordering within an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOrder {
    Ascending,
    Descending,
    /// Full-text index over the field contents
    Text,
}

/// One indexed document path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    /// Dotted path into the serialized document (`patient.id`)
    pub field: String,
    pub order: IndexOrder,
}

impl IndexKey {
    pub fn new(field: impl Into<String>, order: IndexOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Index definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSpec {
    pub name: String,
    pub keys: Vec<IndexKey>,
    /// Documents expire this long after the indexed timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<u64>,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, keys: Vec<IndexKey>) -> Self {
        Self {
            name: name.into(),
            keys,
            expire_after_seconds: None,
        }
    }

    /// Expire documents `days` after the indexed timestamp
    ///
    /// Saturates at `u64::MAX` seconds instead of overflowing.
    pub fn with_expiry_days(mut self, days: u64) -> Self {
        self.expire_after_seconds = Some(days.checked_mul(SECONDS_PER_DAY).unwrap_or(u64::MAX));
        self
    }

    pub fn is_text(&self) -> bool {
        self.keys.iter().any(|key| key.order == IndexOrder::Text)
    }
}

/// Patient lookup, raw-text search and processing-time expiry
pub fn default_indexes(expire_after_days: u64) -> Vec<IndexSpec> {
    vec![
        IndexSpec::new(
            "patient_id_timestamp",
            vec![
                IndexKey::new("patient.id", IndexOrder::Ascending),
                IndexKey::new("timestamp", IndexOrder::Descending),
            ],
        ),
        IndexSpec::new("raw_text", vec![IndexKey::new("raw", IndexOrder::Text)]),
        IndexSpec::new(
            "processed_at_ttl",
            vec![IndexKey::new("processedAt", IndexOrder::Ascending)],
        )
        .with_expiry_days(expire_after_days),
    ]
}
