//! Generic `/api/...` passthrough for endpoints without a dedicated handler.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use super::forward_failure;
use crate::services::forward::ForwardRequest;
use crate::state::AppState;

pub const PROXY_FAILURE: &str = "Request failed";

/// Forward any `/api/...` request, keeping method, JSON body, query string,
/// and whitelisted headers.
pub async fn forward_any(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let Some(endpoint) = uri.path().strip_prefix("/api/") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, %method, %endpoint, "rejecting non-JSON body");
            return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Request body must be JSON" }))).into_response();
        }
    };

    let request = ForwardRequest { method, endpoint: endpoint.to_owned(), body, headers, query };
    match state.forwarder.forward(request).await {
        Ok(forwarded) => forwarded.into_response(),
        Err(e) => forward_failure(&e, PROXY_FAILURE),
    }
}

/// Empty bodies are forwarded as no body at all.
fn parse_body(raw: &[u8]) -> Result<Option<Value>, serde_json::Error> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw).map(Some)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
