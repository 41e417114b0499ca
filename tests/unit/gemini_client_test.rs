use ragchat::services::llm_client::{
    AnswerGenerator, GeminiClient, GenerationError, GenerationParams,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn client(uri: String) -> GeminiClient {
    GeminiClient::new(uri, "test-key".to_string(), "gemini-2.0-flash".to_string())
}

#[tokio::test]
async fn test_generate_sends_sampling_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "prompt text" }] }],
            "generationConfig": { "temperature": 0.3, "maxOutputTokens": 500 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  Câu trả lời " }, { "text": "đầy đủ.\n" }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = client(mock_server.uri())
        .generate("prompt text", GenerationParams::default())
        .await
        .unwrap();

    // Trimming is the orchestrator's job; the client returns raw text
    assert_eq!(answer, "  Câu trả lời đầy đủ.\n");
}

#[tokio::test]
async fn test_generate_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&mock_server)
        .await;

    let result = client(mock_server.uri())
        .generate("p", GenerationParams::default())
        .await;

    match result {
        Err(GenerationError::ApiError { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_without_candidates_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&mock_server)
        .await;

    let result = client(mock_server.uri())
        .generate("p", GenerationParams::default())
        .await;
    assert!(matches!(result, Err(GenerationError::InvalidResponse(msg)) if msg.contains("SAFETY")));
}

#[tokio::test]
async fn test_health_check_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models/gemini-2.0-flash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-2.0-flash" })))
        .mount(&mock_server)
        .await;

    assert!(client(mock_server.uri()).health_check().await.unwrap());
}

#[tokio::test]
async fn test_health_check_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models/gemini-2.0-flash"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    assert!(!client(mock_server.uri()).health_check().await.unwrap());
}
