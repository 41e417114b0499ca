use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::dto::ErrorResponse;
use crate::orchestrator::ChatError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Tenant ID is required for new sessions.")]
    MissingTenantId,
    #[error("Session ID is required (x-session-id header or session_id query parameter).")]
    MissingSessionId,
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingTenantId | ApiError::MissingSessionId => StatusCode::BAD_REQUEST,
            ApiError::Chat(ChatError::Retrieval(_)) | ApiError::Chat(ChatError::Generation(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Chat(ChatError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Chat(ChatError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Client-facing text. Upstream error details stay in the logs.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Chat(ChatError::Retrieval(_)) => {
                "Knowledge base search is temporarily unavailable.".to_string()
            }
            ApiError::Chat(ChatError::Generation(_)) => {
                "Answer generation is temporarily unavailable.".to_string()
            }
            ApiError::Chat(ChatError::Store(_)) => {
                "Conversation history is temporarily unavailable.".to_string()
            }
            ApiError::Chat(ChatError::Timeout { .. }) => {
                "The upstream service did not respond in time.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Bad request: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}
