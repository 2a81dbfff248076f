//! Auth routes: login forwarding.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

use super::forward_failure;
use crate::services::forward::ForwardRequest;
use crate::state::AppState;

pub const LOGIN_FAILURE: &str = "Authentication failed";

/// `POST /api/v1/auth/login`: forward the credentials and return the
/// backend's response unchanged.
///
/// The body is parsed here rather than by an extractor so that every failure,
/// a malformed body included, answers with `{ "message": ... }`.
pub async fn login(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = match serde_json::from_slice::<Value>(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "login body is not JSON");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": LOGIN_FAILURE }))).into_response();
        }
    };

    let request = ForwardRequest {
        method: Method::POST,
        endpoint: "v1/auth/login".into(),
        body: Some(body),
        headers,
        query: Vec::new(),
    };
    match state.forwarder.forward(request).await {
        Ok(forwarded) => forwarded.into_response(),
        Err(e) => forward_failure(&e, LOGIN_FAILURE),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
