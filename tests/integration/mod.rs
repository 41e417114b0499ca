// tests/integration/mod.rs

pub use serde_json::json;
pub use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use ragchat::{
    api::routes::{create_router, AppState},
    config::Config,
    models::RetrievedPassage,
    orchestrator::ChatOrchestrator,
    services::{
        llm_client::{AnswerGenerator, GenerationError, GenerationParams},
        retriever::{RetrievalError, Retriever},
    },
    storage::{IndexError, InMemorySessionStore, RedisSessionStore},
};
use std::sync::Mutex;
use std::time::Duration;

pub mod redis_store;

// ============================================
// Shared Test Helpers
// ============================================

/// Retriever that always returns the same passages.
pub struct StaticRetriever(pub Vec<RetrievedPassage>);

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(
        &self,
        _query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        Ok(self.0.iter().take(top_k).cloned().collect())
    }
}

/// Generator that answers with a fixed text and remembers every prompt.
#[derive(Default)]
pub struct RecordingGenerator {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: GenerationParams,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    async fn health_check(&self) -> Result<bool, GenerationError> {
        Ok(true)
    }
}

/// Retriever whose vector index always rejects the query.
pub struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn search(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        Err(RetrievalError::Index(IndexError::ApiError {
            status: 401,
            message: "invalid api key pc-secret-123".to_string(),
        }))
    }
}

pub fn passage(text: &str) -> RetrievedPassage {
    RetrievedPassage {
        text: text.to_string(),
        score: 0.9,
        metadata: json!({}),
    }
}

pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        gemini_api_key: Some("test-key".to_string()),
        cors_enabled: true,
        ..Config::default()
    })
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemorySessionStore>,
    pub generator: Arc<RecordingGenerator>,
}

pub fn create_test_app_with(passages: Vec<RetrievedPassage>) -> TestApp {
    create_test_app_from(
        Arc::new(StaticRetriever(passages)),
        Arc::new(RecordingGenerator::answering(" Đây là câu trả lời. ")),
    )
}

pub fn create_test_app_from(
    retriever: Arc<dyn Retriever>,
    generator: Arc<RecordingGenerator>,
) -> TestApp {
    let config = create_test_config();
    let store = Arc::new(InMemorySessionStore::new(config.session_ttl()));

    let orchestrator = Arc::new(ChatOrchestrator::from_config(
        store.clone(),
        retriever,
        generator.clone(),
        &config,
    ));

    TestApp {
        router: create_router(AppState {
            config,
            orchestrator,
        }),
        store,
        generator,
    }
}

/// App whose index returns nothing, so every non-greeting gets the no-context reply.
pub fn create_test_app() -> TestApp {
    create_test_app_with(Vec::new())
}

pub const TEST_REDIS_URL: &str = "redis://127.0.0.1:6379/15";

pub async fn is_redis_running() -> bool {
    let Ok(client) = redis::Client::open(TEST_REDIS_URL) else {
        return false;
    };
    matches!(
        tokio::time::timeout(
            Duration::from_secs(2),
            redis::aio::ConnectionManager::new(client)
        )
        .await,
        Ok(Ok(_))
    )
}

pub async fn create_redis_store(ttl: Duration) -> RedisSessionStore {
    RedisSessionStore::connect(TEST_REDIS_URL, ttl)
        .await
        .expect("Redis should be reachable")
}
