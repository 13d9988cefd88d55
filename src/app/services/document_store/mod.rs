//! Document store for normalized documents
//!
//! The indexing pipeline talks to storage only through [`DocumentSink`]:
//! a one-time `ensure_indexes` call followed by independent per-document
//! `insert` calls. Inserts may run concurrently and are not assumed to be
//! idempotent.
//!
//! # Architecture
//!
//! - [`indexes`] - Index definitions as data ([`IndexSpec`])
//! - [`json_lines`] - [`JsonLinesStore`], one JSON document per line per collection
//! - [`memory`] - [`MemoryStore`], retaining in-memory sink for tests
//! - [`discard`] - [`DiscardSink`], counts and drops documents for dry runs
//!
//! # Usage
//!
//! ```rust
//! use hl7_indexer::DocumentExtractor;
//! use hl7_indexer::app::services::document_store::{DocumentSink, MemoryStore};
//!
//! # async fn example() -> hl7_indexer::Result<()> {
//! let store = MemoryStore::new();
//! store.ensure_indexes().await?;
//!
//! let document = DocumentExtractor::default().process("MSH|^~\\&|||||||ADT^A01|1");
//! let ack = store.insert("messages", &document).await?;
//!
//! assert_eq!(store.count("messages").await, 1);
//! println!("Inserted {}", ack.inserted_id);
//! # Ok(())
//! # }
//! ```

pub mod discard;
pub mod indexes;
pub mod json_lines;
pub mod memory;

#[cfg(test)]
mod tests;

pub use discard::DiscardSink;
pub use indexes::{IndexKey, IndexOrder, IndexSpec, default_indexes};
pub use json_lines::JsonLinesStore;
pub use memory::MemoryStore;

use crate::app::models::NormalizedDocument;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

/// Acknowledgment returned for every stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub inserted_id: Uuid,
}

impl InsertAck {
    /// Acknowledge with a freshly generated identifier
    pub fn generate() -> Self {
        Self {
            inserted_id: Uuid::new_v4(),
        }
    }
}

/// Storage collaborator for normalized documents
pub trait DocumentSink: Send + Sync {
    /// Establish lookup, full-text and expiry indexes
    ///
    /// Called once before the first insert of a run, never per document.
    fn ensure_indexes(&self) -> impl Future<Output = Result<()>> + Send;

    /// Store one document in the named collection
    fn insert(
        &self,
        collection: &str,
        document: &NormalizedDocument,
    ) -> impl Future<Output = Result<InsertAck>> + Send;
}

/// Reject collection names that are empty or could escape the store root
pub fn validate_collection_name(collection: &str) -> Result<()> {
    if collection.trim().is_empty() {
        return Err(Error::storage("Collection name cannot be empty"));
    }

    if collection.contains(['/', '\\']) || collection.starts_with('.') || collection.contains('\0')
    {
        return Err(Error::storage(format!(
            "Invalid collection name '{}'",
            collection
        )));
    }

    Ok(())
}
