//! Authenticated REST client for the front end's own `/api/...` surface.
//!
//! Client-side (hydrate): requests go out through `gloo-net`.
//! Tests drive the same client through a scripted [`HttpTransport`].
//!
//! ERROR HANDLING
//! ==============
//! Every call settles into `Result<_, ApiError>`. A 401 from any endpoint is
//! reported as [`ApiError::Unauthorized`] so the session state machine can
//! react to it in one place instead of each caller inspecting status codes.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::types::{Job, LoginRequest, NewJob};
use crate::util::credentials::CredentialStore;

pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/api/v1/auth/logout";
pub const CURRENT_USER_ENDPOINT: &str = "/api/v1/auth/user";
pub const JOBS_ENDPOINT: &str = "/api/v1/jobs";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered 401. Keeps the server's message when it sent one.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// Any other non-success status, with the server's message when it sent one.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body did not have the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status behind this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// The server-provided message, if the error carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } | Self::Unauthorized { message: Some(message) } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully prepared outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Bearer token to send as `Authorization`, when one is stored.
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_deref().map(bearer_header)
    }
}

/// Status and raw body of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// The wire underneath [`ApiClient`].
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

/// Map a raw response onto the client's result convention.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for 401, [`ApiError::Http`] for other
/// non-2xx statuses, and [`ApiError::Decode`] for a 2xx body that is not JSON.
pub fn interpret_response(response: ApiResponse) -> Result<Value, ApiError> {
    let ApiResponse { status, body } = response;
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
    }
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty());
    if status == 401 {
        return Err(ApiError::Unauthorized { message });
    }
    Err(ApiError::Http { status, message: message.unwrap_or_else(|| request_failed_message(status)) })
}

/// Decode a payload that may be wrapped as `{ "data": ... }`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when neither the envelope contents nor the
/// bare body match `T`.
pub fn decode_enveloped<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let inner = match body {
        Value::Object(mut map) if map.get("data").is_some_and(|d| d.is_array() || d.is_object()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(|e| ApiError::Decode(e.to_string()))
}

/// REST client that attaches the stored bearer token to every request.
pub struct ApiClient<T, S> {
    transport: T,
    store: S,
}

impl<T: HttpTransport, S: CredentialStore> ApiClient<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self { transport, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn prepare(&self, method: Method, path: impl Into<String>) -> ApiRequest {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: self.store.get().map(|c| c.token),
            body: None,
        }
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        let result = interpret_response(response);
        if let Err(ApiError::Unauthorized { .. }) = &result {
            log::warn!("{path}: unauthorized");
        }
        result
    }

    /// `POST /api/v1/auth/login`. Returns the raw body; token extraction is
    /// left to the session state machine.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let mut request = self.prepare(Method::Post, LOGIN_ENDPOINT);
        request.body = Some(
            serde_json::to_value(LoginRequest { email, password }).map_err(|e| ApiError::Decode(e.to_string()))?,
        );
        self.call(request).await
    }

    /// `POST /api/v1/auth/logout`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.call(self.prepare(Method::Post, LOGOUT_ENDPOINT))
            .await
            .map(|_| ())
    }

    /// `GET /api/v1/auth/user`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn current_user(&self) -> Result<Value, ApiError> {
        self.call(self.prepare(Method::Get, CURRENT_USER_ENDPOINT))
            .await
    }

    /// `GET /api/v1/jobs` with optional query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_jobs(&self, query: &[(String, String)]) -> Result<Vec<Job>, ApiError> {
        let mut request = self.prepare(Method::Get, JOBS_ENDPOINT);
        request.query = query.to_vec();
        decode_enveloped(self.call(request).await?)
    }

    /// `GET /api/v1/jobs/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_job(&self, id: i64) -> Result<Job, ApiError> {
        let request = self.prepare(Method::Get, format!("{JOBS_ENDPOINT}/{id}"));
        decode_enveloped(self.call(request).await?)
    }

    /// `POST /api/v1/jobs`. Returns the backend's body unchanged.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn create_job(&self, job: &NewJob) -> Result<Value, ApiError> {
        let mut request = self.prepare(Method::Post, JOBS_ENDPOINT);
        request.body = Some(serde_json::to_value(job).map_err(|e| ApiError::Decode(e.to_string()))?);
        self.call(request).await
    }
}

// =============================================================================
// BROWSER TRANSPORT
// =============================================================================

/// `gloo-net` transport against the page's own origin.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        use gloo_net::http::Request;

        let builder = match request.method {
            Method::Get => Request::get(&request.path),
            Method::Post => Request::post(&request.path),
        };
        let mut builder = builder
            .header("Content-Type", "application/json")
            .query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(auth) = request.authorization() {
            builder = builder.header("Authorization", &auth);
        }
        let prepared = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let resp = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(feature = "hydrate")]
pub type BrowserClient = ApiClient<GlooTransport, crate::util::credentials::CookieStore<crate::util::credentials::DocumentCookies>>;

/// Client over the page's cookies and `fetch`.
#[cfg(feature = "hydrate")]
pub fn browser_client() -> BrowserClient {
    ApiClient::new(GlooTransport, crate::util::credentials::browser_store())
}

// =============================================================================
// TEST HELPERS
// =============================================================================
