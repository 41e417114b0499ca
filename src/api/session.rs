//! Session id resolution for inbound requests

use axum::http::HeaderMap;

use crate::models::SessionId;

pub const SESSION_HEADER: &str = "x-session-id";

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Header `x-session-id` wins over the `session_id` query parameter.
/// Blank values count as absent.
pub fn resolve_session_id(headers: &HeaderMap, query_session: Option<&str>) -> Option<SessionId> {
    headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(non_empty)
        .or_else(|| query_session.and_then(non_empty))
        .map(SessionId::new)
}

/// A fresh session id for `tenant_id`, if one was given.
pub fn new_session_for(tenant_id: Option<&str>) -> Option<SessionId> {
    tenant_id.and_then(non_empty).map(SessionId::for_tenant)
}
