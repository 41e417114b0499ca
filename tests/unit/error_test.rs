use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ragchat::api::ApiError;
use ragchat::orchestrator::{ChatError, UpstreamStage};
use ragchat::services::llm_client::GenerationError;
use ragchat::services::retriever::RetrievalError;
use ragchat::storage::IndexError;
use std::time::Duration;

#[test]
fn test_missing_ids_are_bad_requests() {
    assert_eq!(ApiError::MissingTenantId.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::MissingSessionId.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        ApiError::MissingTenantId.detail(),
        "Tenant ID is required for new sessions."
    );
}

#[test]
fn test_timeout_maps_to_gateway_timeout() {
    let err = ApiError::from(ChatError::Timeout {
        stage: UpstreamStage::Generation,
        timeout: Duration::from_secs(30),
    });
    assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[test]
fn test_upstream_details_are_not_exposed() {
    let err = ApiError::from(ChatError::Generation(GenerationError::ApiError {
        status: 403,
        message: "API key sk-secret is invalid".to_string(),
    }));

    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert!(!err.detail().contains("sk-secret"));
    assert_eq!(err.detail(), "Answer generation is temporarily unavailable.");
}

#[test]
fn test_retrieval_failure_detail() {
    let err = ApiError::from(ChatError::Retrieval(RetrievalError::Index(
        IndexError::CollectionNotFound("knowledge_base".to_string()),
    )));
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        err.detail(),
        "Knowledge base search is temporarily unavailable."
    );
}

#[tokio::test]
async fn test_into_response_has_detail_body() {
    let response = ApiError::MissingSessionId.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("Session ID is required"));
}
