pub mod embedding_provider;
pub mod llm_client;
pub mod retriever;

// Re-export for convenience
pub use embedding_provider::{EmbeddingProvider, OllamaProvider};
pub use llm_client::{AnswerGenerator, GeminiClient, GenerationParams, OllamaGenerator};
pub use retriever::{Retriever, SemanticRetriever};
