// src/services/embedding_provider.rs

use async_trait::async_trait;
use thiserror::Error;

/// Provider-specific errors
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("No embeddings returned")]
    NoEmbeddings,
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),
}

/// Trait for embedding providers (Ollama, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for the given text content
    async fn generate_embedding(&self, content: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Ollama provider implementation
pub struct OllamaProvider {
    ollama: ollama_rs::Ollama,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider from a full base URL such as `http://localhost:11434`
    pub fn new(base_url: &str, model: String) -> Result<Self, ProviderError> {
        let ollama = ollama_rs::Ollama::try_new(base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self { ollama, model })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn generate_embedding(&self, content: &str) -> Result<Vec<f32>, ProviderError> {
        use ollama_rs::generation::embeddings::request::{
            EmbeddingsInput, GenerateEmbeddingsRequest,
        };

        let input = EmbeddingsInput::Single(content.to_string());
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), input);

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        response
            .embeddings
            .into_iter()
            .next()
            .filter(|embedding| !embedding.is_empty())
            .ok_or(ProviderError::NoEmbeddings)
    }
}

/// Mock provider for testing
pub struct MockProvider {
    pub response: Result<Vec<f32>, ProviderError>,
    pub call_count: std::sync::Arc<std::sync::Mutex<usize>>,
}

impl MockProvider {
    /// Create a mock provider that returns a successful embedding
    pub fn new_success(embedding: Vec<f32>) -> Self {
        Self {
            response: Ok(embedding),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    /// Create a mock provider that returns an error
    pub fn new_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            call_count: std::sync::Arc::new(std::sync::Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.call_count.lock().map(|count| *count).unwrap_or_default()
    }
}

#[async_trait]
impl EmbeddingProvider for MockProvider {
    async fn generate_embedding(&self, _content: &str) -> Result<Vec<f32>, ProviderError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }
        self.response.clone()
    }
}
