use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::kernel::memory::store::{VectorStore, VectorStoreError};

/// HTTP adapter for a document-oriented vector store. Write-only; the core
/// never reads back through this client.
#[derive(Clone)]
pub struct HttpVectorStore {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    key: &'a str,
    content: &'a str,
    metadata: &'a serde_json::Value,
}

impl HttpVectorStore {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(2)) // HARD Timeout Enforcement (Network Level)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            collection: collection.into(),
        }
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    async fn add_document(
        &self,
        key: &str,
        content: &str,
        metadata: serde_json::Value,
    ) -> Result<(), VectorStoreError> {
        let body = UpsertRequest {
            key,
            content,
            metadata: &metadata,
        };

        let response = self
            .client
            .post(format!(
                "{}/collections/{}/documents",
                self.base_url, self.collection
            ))
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VectorStoreError::Rejected(format!(
                "server returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
