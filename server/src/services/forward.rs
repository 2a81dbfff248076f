//! Request forwarder: re-issues inbound API calls against the backend.
//!
//! DESIGN
//! ======
//! Browser code only ever talks to this server's `/api/...` surface; the
//! backend's network location lives here alone. A forwarded request carries
//! the JSON body, the query parameters in order, and a whitelisted subset of
//! inbound headers. Nothing else from the inbound request crosses over.
//!
//! ERROR HANDLING
//! ==============
//! Backend error responses keep their status and JSON body so route handlers
//! can hand the backend's own message back to the browser.

use axum::http::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderName};
use axum::http::{HeaderMap, Method};
use serde_json::Value;
use thiserror::Error;

/// Inbound headers that are copied onto the backend request.
pub const FORWARDED_HEADERS: [HeaderName; 2] = [AUTHORIZATION, ACCEPT_LANGUAGE];

#[derive(Debug, Error)]
pub enum ForwardError {
    /// The backend answered with a non-success status.
    #[error("backend responded with status {status}")]
    Backend { status: u16, body: Value },

    /// The request could not be sent or the response could not be read.
    #[error("backend request failed: {0}")]
    Transport(String),

    /// A success response whose body was not JSON.
    #[error("backend response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ForwardError {
    /// Backend status, when the backend actually answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `message` field, when it sent one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Backend { body, .. } => body.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// The parts of an inbound request that get forwarded.
#[derive(Debug, Clone, Default)]
pub struct ForwardRequest {
    pub method: Method,
    /// Path below `/api/`, e.g. `v1/jobs`.
    pub endpoint: String,
    pub body: Option<Value>,
    /// Inbound headers; only [`FORWARDED_HEADERS`] are sent on.
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
}

/// A successful backend reply: its status and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    pub status: u16,
    pub body: Value,
}

/// Keep only the whitelisted headers.
#[must_use]
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in &FORWARDED_HEADERS {
        for value in headers.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// HTTP client bound to one backend base URL.
#[derive(Clone)]
pub struct Forwarder {
    http: reqwest::Client,
    base_url: String,
}

impl Forwarder {
    /// # Errors
    ///
    /// Returns [`ForwardError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, ForwardError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ForwardError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend URL for an endpoint below `/api/`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Send `request` to the backend and return its status and JSON body.
    ///
    /// An empty success body comes back as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Backend`] for non-2xx responses,
    /// [`ForwardError::Transport`] when the backend cannot be reached, and
    /// [`ForwardError::Decode`] when a success body is not JSON.
    pub async fn forward(&self, request: ForwardRequest) -> Result<Forwarded, ForwardError> {
        let ForwardRequest { method, endpoint, body, headers, query } = request;
        let url = self.endpoint_url(&endpoint);
        let headers = filter_headers(&headers);

        tracing::debug!(
            %method,
            %endpoint,
            headers = ?headers.keys().collect::<Vec<_>>(),
            has_body = body.is_some(),
            params = ?query,
            "forwarding request"
        );

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, %method, %endpoint, "backend unreachable");
            ForwardError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ForwardError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::warn!(%method, %endpoint, status, "backend returned error");
            let body = serde_json::from_str(&text).unwrap_or(Value::Null);
            return Err(ForwardError::Backend { status, body });
        }
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ForwardError::Decode(e.to_string()))?
        };
        Ok(Forwarded { status, body })
    }
}

#[cfg(test)]
#[path = "forward_test.rs"]
mod tests;
