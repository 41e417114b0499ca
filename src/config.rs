use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_GREETING_WORDS: [&str; 4] = ["hi", "hello", "chào", "xin chào"];
pub const DEFAULT_GREETING_RESPONSE: &str = "Xin chào! Tôi có thể giúp gì cho bạn?";
pub const DEFAULT_NO_CONTEXT_RESPONSE: &str =
    "Xin lỗi, tôi không tìm thấy thông tin liên quan đến câu hỏi của bạn.";
pub const DEFAULT_USER_LABEL: &str = "Người dùng";
pub const DEFAULT_BOT_LABEL: &str = "Bot";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("Missing credential: {0} is required for the selected backend")]
    MissingCredential(&'static str),
}

/// Where conversation history lives.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    Chroma,
    Pinecone,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    Gemini,
    Ollama,
}

/// Main configuration for the chat service
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub server_host: String,

    /// HTTP server port
    #[validate(range(min = 1024, max = 65535))]
    pub server_port: u16,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,

    /// Whether a permissive CORS layer is installed
    pub cors_enabled: bool,

    // ---- session memory ----
    pub session_backend: SessionBackend,

    /// Redis connection string
    pub redis_url: String,

    /// Session expiry, measured from the most recent write
    #[validate(range(min = 1))]
    pub session_ttl_secs: u64,

    /// Number of recent turns rendered into the prompt
    #[validate(range(min = 1, max = 100))]
    pub history_window: usize,

    // ---- retrieval ----
    /// Passages requested from the vector index per query
    #[validate(range(min = 1, max = 100))]
    pub top_k: usize,

    /// Ollama base URL (embeddings, and generation when `llm_backend = "ollama"`)
    pub ollama_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Retries for transient embedding failures
    #[validate(range(max = 10))]
    pub embedding_retries: u32,

    /// Maximum concurrent embedding requests
    #[validate(range(min = 1, max = 64))]
    pub embedding_concurrency: usize,

    pub vector_backend: VectorBackend,

    /// Chroma collection or Pinecone index name
    #[validate(length(min = 1))]
    pub index_name: String,

    /// Chroma base URL
    pub chroma_url: String,

    pub pinecone_api_key: Option<String>,

    /// Pinecone data-plane host of the index, e.g. `https://docs-abc123.svc.pinecone.io`
    pub pinecone_index_host: Option<String>,

    pub pinecone_namespace: Option<String>,

    // ---- generation ----
    pub llm_backend: LlmBackend,

    pub gemini_api_key: Option<String>,

    pub gemini_model: String,

    pub gemini_base_url: String,

    /// Model used when generating through Ollama
    pub generation_model: String,

    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,

    #[validate(range(min = 1, max = 8192))]
    pub max_output_tokens: u32,

    /// Upper bound for any single retrieval or generation call
    #[validate(range(min = 1))]
    pub upstream_timeout_secs: u64,

    // ---- conversation texts ----
    #[validate(length(min = 1))]
    pub greeting_words: Vec<String>,

    pub greeting_response: String,

    pub no_context_response: String,

    pub user_label: String,

    pub bot_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_level: "info".to_string(),
            cors_enabled: false,
            session_backend: SessionBackend::Redis,
            redis_url: "redis://localhost:6379/0".to_string(),
            session_ttl_secs: 3600,
            history_window: 6,
            top_k: 3,
            ollama_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text:latest".to_string(),
            embedding_retries: 2,
            embedding_concurrency: 5,
            vector_backend: VectorBackend::Chroma,
            index_name: "knowledge_base".to_string(),
            chroma_url: "http://localhost:8000".to_string(),
            pinecone_api_key: None,
            pinecone_index_host: None,
            pinecone_namespace: None,
            llm_backend: LlmBackend::Gemini,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            generation_model: "llama3.1:8b".to_string(),
            temperature: 0.3,
            max_output_tokens: 500,
            upstream_timeout_secs: 30,
            greeting_words: DEFAULT_GREETING_WORDS.iter().map(|w| w.to_string()).collect(),
            greeting_response: DEFAULT_GREETING_RESPONSE.to_string(),
            no_context_response: DEFAULT_NO_CONTEXT_RESPONSE.to_string(),
            user_label: DEFAULT_USER_LABEL.to_string(),
            bot_label: DEFAULT_BOT_LABEL.to_string(),
        }
    }
}

impl Config {
    /// Loads defaults, then `~/.ragchat/config.*` (if present), then `RAGCHAT__*` env vars.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let home = dirs::home_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        let file = config::File::with_name(&format!("{}/.ragchat/config", home)).required(false);
        Self::build(file)
    }

    /// Same layering as [`Config::load`], but with an explicit config file that must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigLoadError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let d = Config::default();
        let settings = config::Config::builder()
            // Core defaults
            .set_default("server_host", d.server_host)?
            .set_default("server_port", d.server_port)?
            .set_default("log_level", d.log_level)?
            .set_default("cors_enabled", d.cors_enabled)?
            // Session memory
            .set_default("session_backend", "redis")?
            .set_default("redis_url", d.redis_url)?
            .set_default("session_ttl_secs", d.session_ttl_secs)?
            .set_default("history_window", d.history_window as u64)?
            // Retrieval
            .set_default("top_k", d.top_k as u64)?
            .set_default("ollama_url", d.ollama_url)?
            .set_default("embedding_model", d.embedding_model)?
            .set_default("embedding_retries", d.embedding_retries)?
            .set_default("embedding_concurrency", d.embedding_concurrency as u64)?
            .set_default("vector_backend", "chroma")?
            .set_default("index_name", d.index_name)?
            .set_default("chroma_url", d.chroma_url)?
            // Generation
            .set_default("llm_backend", "gemini")?
            .set_default("gemini_model", d.gemini_model)?
            .set_default("gemini_base_url", d.gemini_base_url)?
            .set_default("generation_model", d.generation_model)?
            .set_default("temperature", d.temperature as f64)?
            .set_default("max_output_tokens", d.max_output_tokens)?
            .set_default("upstream_timeout_secs", d.upstream_timeout_secs)?
            // Conversation texts
            .set_default("greeting_words", d.greeting_words)?
            .set_default("greeting_response", d.greeting_response)?
            .set_default("no_context_response", d.no_context_response)?
            .set_default("user_label", d.user_label)?
            .set_default("bot_label", d.bot_label)?
            .add_source(file)
            // Environment overrides: RAGCHAT__SERVER_PORT, RAGCHAT__GEMINI_API_KEY, etc.
            .add_source(
                config::Environment::with_prefix("RAGCHAT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("greeting_words")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Field validation plus the credentials each selected backend needs.
    pub fn check(&self) -> Result<(), ConfigLoadError> {
        self.validate()?;

        if self.llm_backend == LlmBackend::Gemini && blank(&self.gemini_api_key) {
            return Err(ConfigLoadError::MissingCredential("gemini_api_key"));
        }
        if self.vector_backend == VectorBackend::Pinecone {
            if blank(&self.pinecone_api_key) {
                return Err(ConfigLoadError::MissingCredential("pinecone_api_key"));
            }
            if blank(&self.pinecone_index_host) {
                return Err(ConfigLoadError::MissingCredential("pinecone_index_host"));
            }
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}
