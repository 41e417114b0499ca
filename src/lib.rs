//! ragchat - conversational RAG service with expiring session memory

pub mod api;
pub mod config;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::api::dto::*;
pub use crate::api::routes::{create_router, AppState};
pub use crate::config::Config;
pub use crate::models::{RetrievedPassage, Role, SessionId, Turn};
pub use crate::orchestrator::{ChatError, ChatOrchestrator, ConversationMemory};
pub use crate::services::{AnswerGenerator, Retriever};
pub use crate::storage::{InMemorySessionStore, RedisSessionStore, SessionStore};
