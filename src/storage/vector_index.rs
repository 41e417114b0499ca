use async_trait::async_trait;
use thiserror::Error;

use crate::models::RetrievedPassage;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Index API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Similarity search over a hosted vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest passages to `embedding`, at most `top_k`, best first.
    async fn query(
        &self,
        embedding: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, IndexError>;

    /// Cheap reachability probe used at startup.
    async fn ping(&self) -> Result<(), IndexError>;
}

/// Passage text lives under `metadata.text` for indexes populated without documents.
pub(crate) fn metadata_text(metadata: &serde_json::Value) -> Option<String> {
    metadata
        .get("text")
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
}
