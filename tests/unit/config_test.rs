use ragchat::config::{Config, ConfigLoadError, LlmBackend, SessionBackend, VectorBackend};
use std::fs;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_load_from_file_overrides_defaults() {
    let (_dir, path) = write_config(
        r#"
server_port = 9090
session_backend = "memory"
session_ttl_secs = 120
top_k = 5
gemini_api_key = "file-key"
greeting_words = ["hey", "yo"]
"#,
    );

    let cfg = Config::load_from(&path).unwrap();

    assert_eq!(cfg.server_port, 9090);
    assert_eq!(cfg.session_backend, SessionBackend::Memory);
    assert_eq!(cfg.session_ttl().as_secs(), 120);
    assert_eq!(cfg.top_k, 5);
    assert_eq!(cfg.gemini_api_key.as_deref(), Some("file-key"));
    assert_eq!(cfg.greeting_words, vec!["hey", "yo"]);

    // Untouched keys keep their defaults
    assert_eq!(cfg.history_window, 6);
    assert_eq!(cfg.max_output_tokens, 500);
    assert_eq!(cfg.vector_backend, VectorBackend::Chroma);
}

#[test]
fn test_load_from_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigLoadError::Source(_))));
}

#[test]
fn test_load_from_rejects_out_of_range_values() {
    let (_dir, path) = write_config(
        r#"
llm_backend = "ollama"
temperature = 3.5
"#,
    );

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigLoadError::Invalid(_))));
}

#[test]
fn test_load_from_requires_pinecone_credentials() {
    let (_dir, path) = write_config(
        r#"
llm_backend = "ollama"
vector_backend = "pinecone"
"#,
    );

    let result = Config::load_from(&path);
    assert!(matches!(
        result,
        Err(ConfigLoadError::MissingCredential("pinecone_api_key"))
    ));
}

#[test]
fn test_ollama_backend_needs_no_api_key() {
    let (_dir, path) = write_config(r#"llm_backend = "ollama""#);

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.llm_backend, LlmBackend::Ollama);
    assert!(cfg.gemini_api_key.is_none());
}

#[test]
fn test_unknown_backend_is_a_source_error() {
    let (_dir, path) = write_config(
        r#"
gemini_api_key = "k"
session_backend = "postgres"
"#,
    );

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(ConfigLoadError::Source(_))));
}
