use anyhow::Context;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Import our modules
use ragchat::{
    api::routes,
    config::{Config, LlmBackend, SessionBackend, VectorBackend},
    orchestrator::ChatOrchestrator,
    services::{
        AnswerGenerator, GeminiClient, OllamaGenerator, OllamaProvider, SemanticRetriever,
    },
    storage::{ChromaClient, InMemorySessionStore, PineconeClient, RedisSessionStore, SessionStore, VectorIndex},
};

#[derive(Debug, Parser)]
#[command(name = "ragchat", about = "Conversational RAG chat service")]
struct Args {
    /// Config file (TOML/YAML/JSON); defaults to ~/.ragchat/config.* when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured server port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ragchat={},tower_http={}", config.log_level, config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    // Session store
    let store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Redis => Arc::new(
            RedisSessionStore::connect(&config.redis_url, config.session_ttl())
                .await
                .context("Failed to connect to Redis")?,
        ),
        SessionBackend::Memory => {
            let store = InMemorySessionStore::new(config.session_ttl());
            let sweeper = store.clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(Duration::from_secs(60));
                loop {
                    tick.tick().await;
                    let purged = sweeper.purge_expired().await;
                    if purged > 0 {
                        tracing::debug!("Purged {} expired sessions", purged);
                    }
                }
            });
            tracing::warn!("⚠️ Using in-process session store; history is lost on restart");
            Arc::new(store)
        }
    };

    // Vector index
    let index: Arc<dyn VectorIndex> = match config.vector_backend {
        VectorBackend::Chroma => Arc::new(ChromaClient::with_client(
            http.clone(),
            config.chroma_url.clone(),
            config.index_name.clone(),
        )),
        VectorBackend::Pinecone => Arc::new(PineconeClient::with_client(
            http.clone(),
            config
                .pinecone_index_host
                .clone()
                .context("pinecone_index_host is not set")?,
            config
                .pinecone_api_key
                .clone()
                .context("pinecone_api_key is not set")?,
            config.pinecone_namespace.clone(),
        )),
    };

    match index.ping().await {
        Ok(()) => tracing::info!("✅ Vector index reachable ({:?})", config.vector_backend),
        Err(e) => tracing::warn!("⚠️ Vector index not available: {}. Retrieval will fail.", e),
    }

    // Embeddings + retrieval
    let provider = Arc::new(
        OllamaProvider::new(&config.ollama_url, config.embedding_model.clone())
            .context("Invalid Ollama URL")?,
    );
    let retriever = Arc::new(
        SemanticRetriever::new(provider, index)
            .with_concurrency(config.embedding_concurrency)
            .with_max_retries(config.embedding_retries),
    );

    // Answer generation
    let generator: Arc<dyn AnswerGenerator> = match config.llm_backend {
        LlmBackend::Gemini => Arc::new(GeminiClient::with_client(
            http.clone(),
            config.gemini_base_url.clone(),
            config
                .gemini_api_key
                .clone()
                .context("gemini_api_key is not set")?,
            config.gemini_model.clone(),
        )),
        LlmBackend::Ollama => Arc::new(
            OllamaGenerator::new(&config.ollama_url, config.generation_model.clone())
                .context("Invalid Ollama URL")?,
        ),
    };

    match generator.health_check().await {
        Ok(true) => tracing::info!("✅ LLM reachable ({:?})", config.llm_backend),
        Ok(false) => tracing::warn!("⚠️ LLM health check returned false"),
        Err(e) => tracing::warn!("⚠️ LLM not available: {}. Answers will fail.", e),
    }

    let orchestrator = Arc::new(ChatOrchestrator::from_config(
        store, retriever, generator, &config,
    ));

    let config = Arc::new(config);
    let state = routes::AppState {
        config: config.clone(),
        orchestrator,
    };
    let app: Router = routes::create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("🧠 Session TTL: {}s, history window: {}", config.session_ttl_secs, config.history_window);
    tracing::info!("🔎 Top-K: {}, LLM: {:?}", config.top_k, config.llm_backend);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
