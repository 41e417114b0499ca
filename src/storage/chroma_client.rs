use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::vector_index::{metadata_text, IndexError, VectorIndex};
use crate::models::RetrievedPassage;

#[derive(Debug, Serialize)]
struct ChromaQueryRequest {
    query_embeddings: Vec<Vec<f32>>,
    n_results: u32,
    include: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    ids: Vec<Vec<String>>,
    distances: Option<Vec<Vec<f32>>>,
    metadatas: Option<Vec<Vec<Option<Value>>>>,
    documents: Option<Vec<Vec<Option<String>>>>,
}

/// Rust-native ChromaDB query client using HTTP API v2
pub struct ChromaClient {
    base_url: String,
    client: Client,
    tenant: String,
    database: String,
    collection: String,
}

impl ChromaClient {
    pub fn new(base_url: String, collection: String) -> Self {
        Self::with_client(Client::new(), base_url, collection)
    }

    pub fn with_client(client: Client, base_url: String, collection: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tenant: "default_tenant".to_string(),
            database: "default_database".to_string(),
            collection,
        }
    }

    fn collection_url(&self, collection_name: &str) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections/{}",
            self.base_url, self.tenant, self.database, collection_name
        )
    }

    fn collection_operation_url(&self, collection_id: &str, operation: &str) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections/{}/{}",
            self.base_url, self.tenant, self.database, collection_id, operation
        )
    }

    /// Get collection ID by name
    async fn get_collection_id(&self, name: &str) -> Result<String, IndexError> {
        let url = self.collection_url(name);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let collection: Value = response.json().await?;
                collection["id"]
                    .as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| IndexError::CollectionNotFound(name.to_string()))
            }
            StatusCode::NOT_FOUND => Err(IndexError::CollectionNotFound(name.to_string())),
            status => {
                let message = response.text().await?;
                Err(IndexError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Convert the column-oriented Chroma reply into passages.
    /// Cosine distance becomes a similarity score (`1 - distance`).
    fn parse_query_results(response: ChromaQueryResponse) -> Vec<RetrievedPassage> {
        let Some(ids) = response.ids.into_iter().next() else {
            return Vec::new();
        };
        let distances = response
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = response
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let documents = response
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        let mut passages = Vec::with_capacity(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            let metadata = metadatas
                .get(idx)
                .cloned()
                .flatten()
                .unwrap_or_else(|| json!({}));
            let text = documents
                .get(idx)
                .cloned()
                .flatten()
                .or_else(|| metadata_text(&metadata));

            let Some(text) = text else {
                tracing::warn!("Chroma match {} has no document text, skipping", id);
                continue;
            };

            let distance = distances.get(idx).copied().unwrap_or(1.0);
            passages.push(RetrievedPassage {
                text,
                score: 1.0 - distance,
                metadata,
            });
        }
        passages
    }
}

#[async_trait]
impl VectorIndex for ChromaClient {
    /// Query similar vectors
    async fn query(
        &self,
        embedding: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, IndexError> {
        let collection_id = self.get_collection_id(&self.collection).await?;
        let url = self.collection_operation_url(&collection_id, "query");

        let request = ChromaQueryRequest {
            query_embeddings: vec![embedding],
            n_results: top_k as u32,
            include: vec![
                "documents".to_string(),
                "metadatas".to_string(),
                "distances".to_string(),
            ],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        match response.status() {
            StatusCode::OK => {
                let query_response: ChromaQueryResponse = response
                    .json()
                    .await
                    .map_err(|e| IndexError::InvalidResponse(e.to_string()))?;
                Ok(Self::parse_query_results(query_response))
            }
            status => {
                let message = response.text().await?;
                Err(IndexError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Health check method - uses v2 API
    async fn ping(&self) -> Result<(), IndexError> {
        let url = format!("{}/api/v2/heartbeat", self.base_url);
        self.client.get(&url).send().await?.error_for_status()?;
        Ok(())
    }
}
