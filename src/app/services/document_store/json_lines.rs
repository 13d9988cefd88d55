//! JSON-lines document store
//!
//! Each collection is a file `<root>/<collection>.jsonl` holding one
//! document per line, tagged with its generated `_id`. Index definitions
//! are written to a manifest next to the collection files.

use super::indexes::{IndexSpec, default_indexes};
use super::{DocumentSink, InsertAck, validate_collection_name};
use crate::app::models::NormalizedDocument;
use crate::constants::{
    COLLECTION_FILE_EXTENSION, DEFAULT_EXPIRE_AFTER_DAYS, INDEX_MANIFEST_FILENAME,
};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Serialize)]
struct StoredDocument<'a> {
    #[serde(rename = "_id")]
    id: Uuid,
    #[serde(flatten)]
    document: &'a NormalizedDocument,
}

/// Append-only JSON-lines store rooted at a directory
#[derive(Debug)]
pub struct JsonLinesStore {
    root: PathBuf,
    indexes: Vec<IndexSpec>,
    /// Serializes appends so concurrent inserts never interleave lines
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    /// Create a store with the default index set
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_indexes(root, default_indexes(DEFAULT_EXPIRE_AFTER_DAYS))
    }

    /// Create a store with explicit index definitions
    pub fn with_indexes(root: impl Into<PathBuf>, indexes: Vec<IndexSpec>) -> Self {
        Self {
            root: root.into(),
            indexes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// File backing a collection
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", collection, COLLECTION_FILE_EXTENSION))
    }

    /// Index manifest location
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(INDEX_MANIFEST_FILENAME)
    }

    async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::io(
                format!("Failed to create store directory {}", self.root.display()),
                e,
            )
        })
    }
}

impl DocumentSink for JsonLinesStore {
    async fn ensure_indexes(&self) -> Result<()> {
        self.ensure_root().await?;

        let manifest = serde_json::to_string_pretty(&self.indexes)
            .map_err(|e| Error::serialization("Failed to serialize index manifest", e))?;
        let path = self.manifest_path();

        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&path, manifest)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

        info!(
            "Ensured {} indexes in {}",
            self.indexes.len(),
            path.display()
        );
        Ok(())
    }

    async fn insert(&self, collection: &str, document: &NormalizedDocument) -> Result<InsertAck> {
        validate_collection_name(collection)?;

        let ack = InsertAck::generate();
        let mut line = serde_json::to_string(&StoredDocument {
            id: ack.inserted_id,
            document,
        })
        .map_err(|e| Error::serialization("Failed to serialize document", e))?;
        line.push('\n');

        self.ensure_root().await?;
        let path = self.collection_path(collection);

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::io(format!("Failed to append to {}", path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))?;

        debug!("Inserted {} into '{}'", ack.inserted_id, collection);
        Ok(ack)
    }
}
