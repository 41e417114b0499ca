// src/services/retriever.rs
//! Query embedding plus vector-index search

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::models::RetrievedPassage;
use crate::services::embedding_provider::{EmbeddingProvider, ProviderError};
use crate::storage::vector_index::{IndexError, VectorIndex};

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] ProviderError),
    #[error("Vector index error: {0}")]
    Index(#[from] IndexError),
    #[error("Semaphore error: {0}")]
    SemaphoreError(String),
    #[error("Max retries exceeded: {0}")]
    MaxRetriesExceeded(ProviderError),
}

impl From<AcquireError> for RetrievalError {
    fn from(err: AcquireError) -> Self {
        RetrievalError::SemaphoreError(err.to_string())
    }
}

/// Semantic passage lookup consumed by the chat orchestrator.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Up to `top_k` passages ordered by descending relevance. Empty means "nothing relevant".
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError>;
}

/// Embeds the query with an [`EmbeddingProvider`] and searches a [`VectorIndex`].
#[derive(Clone)]
pub struct SemanticRetriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    semaphore: Arc<Semaphore>,
    max_retries: u32,
}

impl SemanticRetriever {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            provider,
            index,
            semaphore: Arc::new(Semaphore::new(5)),
            max_retries: 2,
        }
    }

    /// Bound on concurrent embedding requests
    pub fn with_concurrency(mut self, permits: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    /// Retries after the first failed embedding attempt
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate embedding with retry logic
    pub async fn embed_with_retry(&self, content: &str) -> Result<Vec<f32>, RetrievalError> {
        let _permit = self.semaphore.acquire().await?;
        let mut attempt = 0;

        loop {
            match self.provider.generate_embedding(content).await {
                Ok(embedding) => return Ok(embedding),
                // Don't retry - the model answered, just with nothing
                Err(ProviderError::NoEmbeddings) => {
                    return Err(RetrievalError::Embedding(ProviderError::NoEmbeddings))
                }
                Err(ProviderError::InvalidUrl(url)) => {
                    return Err(RetrievalError::Embedding(ProviderError::InvalidUrl(url)))
                }
                Err(e) if attempt >= self.max_retries => {
                    return Err(RetrievalError::MaxRetriesExceeded(e));
                }
                Err(e) => {
                    let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                    warn!(
                        "Embedding attempt {} failed, retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl Retriever for SemanticRetriever {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let query_embedding = self.embed_with_retry(query).await?;

        let mut passages = self.index.query(query_embedding, top_k).await?;
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        passages.truncate(top_k);

        debug!("Retrieved {} passages", passages.len());
        Ok(passages)
    }
}
