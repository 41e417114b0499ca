use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::api::dto::*;
use crate::api::error::ApiError;
use crate::api::session::{new_session_for, resolve_session_id};
use crate::config::Config;
use crate::orchestrator::ChatOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<ChatOrchestrator>,
}

#[derive(OpenApi)]
#[openapi(
    paths(root, chat, clear_session),
    components(schemas(
        ChatRequest,
        ChatResponse,
        ClearSessionResponse,
        StatusResponse,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    )
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "API OK".to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    params(
        SessionQuery,
        ("x-session-id" = Option<String>, Header, description = "Existing session id")
    ),
    responses(
        (status = 200, description = "Answer for the query", body = ChatResponse),
        (status = 400, description = "No session id and no tenant id", body = ErrorResponse),
        (status = 502, description = "Retrieval or generation failure", body = ErrorResponse),
        (status = 503, description = "Session store unavailable", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SessionQuery>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session_id = resolve_session_id(&headers, params.session_id.as_deref())
        .or_else(|| new_session_for(req.tenant_id.as_deref()));

    // Greetings never touch history, so an unresolvable session is fine here
    if let Some(reply) = state.orchestrator.greeting_reply(&req.query) {
        return Ok(Json(ChatResponse {
            response: reply.to_string(),
            session_id: session_id.map(|id| id.into_inner()),
        }));
    }

    let session_id = session_id.ok_or(ApiError::MissingTenantId)?;
    tracing::info!("Chat request for session {}", session_id);

    let response = state.orchestrator.handle(&req.query, &session_id).await?;

    Ok(Json(ChatResponse {
        response,
        session_id: Some(session_id.into_inner()),
    }))
}

#[utoipa::path(
    post,
    path = "/clear_session",
    params(
        ClearSessionQuery,
        ("x-session-id" = Option<String>, Header, description = "Session to clear")
    ),
    responses(
        (status = 200, description = "Session history deleted", body = ClearSessionResponse),
        (status = 400, description = "No session id supplied", body = ErrorResponse),
        (status = 503, description = "Session store unavailable", body = ErrorResponse)
    )
)]
pub async fn clear_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ClearSessionQuery>,
) -> Result<Json<ClearSessionResponse>, ApiError> {
    let session_id = resolve_session_id(&headers, params.session_id.as_deref())
        .ok_or(ApiError::MissingSessionId)?;

    if let Some(tenant) = params.tenant_id.as_deref() {
        tracing::debug!("Clear requested by tenant {} for {}", tenant, session_id);
    }

    state.orchestrator.clear_session(&session_id).await?;
    tracing::info!("Cleared session {}", session_id);

    Ok(Json(ClearSessionResponse {
        message: "Session cleared".to_string(),
        session_id: session_id.into_inner(),
    }))
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let router = Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/clear_session", post(clear_session))
        .route("/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
