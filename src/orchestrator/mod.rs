pub mod greeting;
pub mod memory;
pub mod prompt;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{Role, SessionId};
use crate::services::llm_client::{AnswerGenerator, GenerationError, GenerationParams};
use crate::services::retriever::{RetrievalError, Retriever};
use crate::storage::session_store::{SessionStore, StoreError};

pub use greeting::GreetingDetector;
pub use memory::{ConversationMemory, SpeakerLabels};

/// External call that a timeout applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Retrieval,
    Generation,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStage::Retrieval => f.write_str("retrieval"),
            UpstreamStage::Generation => f.write_str("generation"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Session store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("{stage} timed out after {timeout:?}")]
    Timeout {
        stage: UpstreamStage,
        timeout: Duration,
    },
}

/// Tunables of the answer pipeline.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub top_k: usize,
    pub history_window: usize,
    pub generation: GenerationParams,
    pub upstream_timeout: Duration,
    pub no_context_response: String,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OrchestratorSettings {
    fn from(cfg: &Config) -> Self {
        OrchestratorSettings {
            top_k: cfg.top_k,
            history_window: cfg.history_window,
            generation: GenerationParams {
                temperature: cfg.temperature,
                max_output_tokens: cfg.max_output_tokens,
            },
            upstream_timeout: cfg.upstream_timeout(),
            no_context_response: cfg.no_context_response.clone(),
        }
    }
}

/// Answers one chat query: greeting short-circuit, retrieval, prompt assembly,
/// generation, and recording of both turns.
///
/// Holds no per-request state; everything session-scoped lives in the store.
pub struct ChatOrchestrator {
    memory: ConversationMemory,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn AnswerGenerator>,
    greeting: GreetingDetector,
    settings: OrchestratorSettings,
}

impl ChatOrchestrator {
    pub fn new(
        memory: ConversationMemory,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn AnswerGenerator>,
        greeting: GreetingDetector,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            memory,
            retriever,
            generator,
            greeting,
            settings,
        }
    }

    pub fn from_config(
        store: Arc<dyn SessionStore>,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn AnswerGenerator>,
        cfg: &Config,
    ) -> Self {
        Self::new(
            ConversationMemory::new(store, SpeakerLabels::from(cfg)),
            retriever,
            generator,
            GreetingDetector::new(&cfg.greeting_words, cfg.greeting_response.clone()),
            OrchestratorSettings::from(cfg),
        )
    }

    /// Canned reply if `query` is a greeting. Nothing is recorded.
    pub fn greeting_reply(&self, query: &str) -> Option<&str> {
        self.greeting.reply(query)
    }

    pub async fn handle(&self, query: &str, session_id: &SessionId) -> Result<String, ChatError> {
        if let Some(reply) = self.greeting_reply(query) {
            debug!("Greeting short-circuit for session {}", session_id);
            return Ok(reply.to_string());
        }

        self.memory
            .record_turn(session_id, Role::User, query)
            .await?;

        let passages = self
            .bounded(
                UpstreamStage::Retrieval,
                self.retriever.search(query, self.settings.top_k),
            )
            .await?;

        if passages.is_empty() {
            info!("No relevant passages for session {}", session_id);
            let response = self.settings.no_context_response.clone();
            self.memory
                .record_turn(session_id, Role::Bot, &response)
                .await?;
            return Ok(response);
        }

        let context = prompt::join_passages(&passages);
        let conversation_context = self
            .memory
            .recent_transcript(session_id, self.settings.history_window)
            .await?;
        let prompt = prompt::build_prompt(&conversation_context, &context, query);
        debug!(
            "Assembled prompt for session {} ({} passages, {} chars)",
            session_id,
            passages.len(),
            prompt.len()
        );

        let generated = self
            .bounded(
                UpstreamStage::Generation,
                self.generator.generate(&prompt, self.settings.generation),
            )
            .await?;

        let answer = generated.trim().to_string();
        self.memory
            .record_turn(session_id, Role::Bot, &answer)
            .await?;
        Ok(answer)
    }

    pub async fn clear_session(&self, session_id: &SessionId) -> Result<(), ChatError> {
        self.memory.clear(session_id).await?;
        Ok(())
    }

    async fn bounded<T, E, F>(&self, stage: UpstreamStage, call: F) -> Result<T, ChatError>
    where
        F: Future<Output = Result<T, E>>,
        ChatError: From<E>,
    {
        let timeout = self.settings.upstream_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result.map_err(ChatError::from),
            Err(_) => Err(ChatError::Timeout { stage, timeout }),
        }
    }
}
