//! In-memory document store

use super::indexes::{IndexSpec, default_indexes};
use super::{DocumentSink, InsertAck, validate_collection_name};
use crate::Result;
use crate::app::models::NormalizedDocument;
use crate::constants::DEFAULT_EXPIRE_AFTER_DAYS;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps documents per collection in insertion order
#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(InsertAck, NormalizedDocument)>>>,
    indexes: Vec<IndexSpec>,
    ensured: RwLock<Vec<IndexSpec>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_indexes(default_indexes(DEFAULT_EXPIRE_AFTER_DAYS))
    }

    pub fn with_indexes(indexes: Vec<IndexSpec>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            indexes,
            ensured: RwLock::new(Vec::new()),
        }
    }

    /// Number of documents stored in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Snapshot of a collection's documents
    pub async fn documents(&self, collection: &str) -> Vec<NormalizedDocument> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    /// Indexes established by `ensure_indexes`
    pub async fn ensured_indexes(&self) -> Vec<IndexSpec> {
        self.ensured.read().await.clone()
    }
}

impl DocumentSink for MemoryStore {
    async fn ensure_indexes(&self) -> Result<()> {
        *self.ensured.write().await = self.indexes.clone();
        Ok(())
    }

    async fn insert(&self, collection: &str, document: &NormalizedDocument) -> Result<InsertAck> {
        validate_collection_name(collection)?;

        let ack = InsertAck::generate();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((ack, document.clone()));
        Ok(ack)
    }
}
