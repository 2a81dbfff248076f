//! Job routes: list forwarding.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::forward_failure;
use crate::services::forward::ForwardRequest;
use crate::state::AppState;

pub const JOBS_FAILURE: &str = "Failed to fetch jobs";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access";

/// `GET /api/v1/jobs`: forward the `Authorization` header and query string.
///
/// A backend 401 is always answered with a fixed message so the backend's
/// wording never reaches the page.
pub async fn list_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let request = ForwardRequest { method: Method::GET, endpoint: "v1/jobs".into(), body: None, headers, query };
    match state.forwarder.forward(request).await {
        Ok(forwarded) => forwarded.into_response(),
        Err(e) if e.status() == Some(401) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": UNAUTHORIZED_MESSAGE }))).into_response()
        }
        Err(e) => forward_failure(&e, JOBS_FAILURE),
    }
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
