//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the front-end-owned `/api/...` surface and stitches it
//! with Leptos SSR rendering under a single Axum router. Every `/api/...`
//! request is answered by forwarding to the backend; page routes pass
//! through the navigation guard before rendering.
//!
//! DESIGN
//! ======
//! Login and job listing have dedicated handlers with their own fallback
//! messages. Other methods on those paths, and every other `/api/...` path,
//! fall through to the generic passthrough.

pub mod auth;
pub mod guard;
pub mod jobs;
pub mod proxy;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::forward::{ForwardError, Forwarded};
use crate::state::AppState;

/// The `/api/...` surface plus health check.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(auth::login).fallback(proxy::forward_any))
        .route("/api/v1/jobs", get(jobs::list_jobs).fallback(proxy::forward_any))
        .route("/api/{*path}", any(proxy::forward_any))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Relay a backend success with its own status. A `204` carries no body.
impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, Json(self.body)).into_response()
    }
}

/// Map a forwarding failure to `{ "message": ... }` with the backend's
/// status, or 500 when the backend never answered.
pub(crate) fn forward_failure(err: &ForwardError, fallback: &str) -> Response {
    let status = err
        .status()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = err.message().unwrap_or(fallback);
    tracing::warn!(error = %err, %status, "forwarded request failed");
    (status, Json(json!({ "message": message }))).into_response()
}

/// Leptos SSR frontend: API routes + guarded page routes + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `Cargo.toml` `[workspace.metadata.leptos]` section).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .layer(middleware::from_fn(guard::page_guard))
        .with_state(leptos_options.clone());

    // Leptos static assets (WASM, CSS, JS) from the site root /pkg directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
