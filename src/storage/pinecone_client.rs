use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::vector_index::{metadata_text, IndexError, VectorIndex};
use crate::models::RetrievedPassage;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PineconeQueryRequest<'a> {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PineconeQueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Debug, Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<Value>,
}

/// Pinecone data-plane client for one index.
///
/// Passages are expected under `metadata.text`.
pub struct PineconeClient {
    client: Client,
    index_host: String,
    api_key: String,
    namespace: Option<String>,
}

impl PineconeClient {
    pub fn new(index_host: String, api_key: String, namespace: Option<String>) -> Self {
        Self::with_client(Client::new(), index_host, api_key, namespace)
    }

    pub fn with_client(
        client: Client,
        index_host: String,
        api_key: String,
        namespace: Option<String>,
    ) -> Self {
        let host = index_host.trim_end_matches('/');
        let index_host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Self {
            client,
            index_host,
            api_key,
            namespace,
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn query(
        &self,
        embedding: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, IndexError> {
        let request = PineconeQueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/query", self.index_host))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IndexError::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: PineconeQueryResponse = response
            .json()
            .await
            .map_err(|e| IndexError::InvalidResponse(e.to_string()))?;

        let passages = body
            .matches
            .into_iter()
            .filter_map(|m| {
                let metadata = m.metadata.unwrap_or_else(|| Value::Object(Default::default()));
                match metadata_text(&metadata) {
                    Some(text) => Some(RetrievedPassage {
                        text,
                        score: m.score,
                        metadata,
                    }),
                    None => {
                        tracing::warn!("Pinecone match {} has no metadata.text, skipping", m.id);
                        None
                    }
                }
            })
            .collect();

        Ok(passages)
    }

    async fn ping(&self) -> Result<(), IndexError> {
        let response = self
            .client
            .post(format!("{}/describe_index_stats", self.index_host))
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IndexError::ApiError {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
