use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("vector store rejected write: {0}")]
    Rejected(String),

    #[error("vector store unavailable: {0}")]
    Unavailable(String),
}

/// Write-only capability consumed by the orchestrator. Long-tier records are
/// mirrored here at capture time; nothing is ever read back.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn add_document(
        &self,
        key: &str,
        content: &str,
        metadata: serde_json::Value,
    ) -> Result<(), VectorStoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub key: String,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Process-local store for the demo driver and for tests.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    documents: Mutex<Vec<StoredDocument>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<StoredDocument> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_document(
        &self,
        key: &str,
        content: &str,
        metadata: serde_json::Value,
    ) -> Result<(), VectorStoreError> {
        self.documents.lock().unwrap().push(StoredDocument {
            key: key.to_string(),
            content: content.to_string(),
            metadata,
        });
        Ok(())
    }
}
