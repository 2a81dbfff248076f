use super::*;
use crate::state::test_helpers::{TEST_TOKEN, spawn_backend, fake_backend};
use axum::http::HeaderValue;
use serde_json::json;

fn get(endpoint: &str) -> ForwardRequest {
    ForwardRequest { method: Method::GET, endpoint: endpoint.into(), ..ForwardRequest::default() }
}

async fn forwarder() -> Forwarder {
    Forwarder::new(&spawn_backend(fake_backend()).await).unwrap()
}

// =============================================================================
// filter_headers / endpoint_url
// =============================================================================

#[test]
fn filter_headers_keeps_whitelist_only() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de-DE"));
    headers.insert("cookie", HeaderValue::from_static("token=abc123"));
    headers.insert("host", HeaderValue::from_static("localhost:3000"));
    headers.insert("x-custom", HeaderValue::from_static("1"));

    let out = filter_headers(&headers);
    assert_eq!(out.len(), 2);
    assert_eq!(out.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    assert_eq!(out.get(ACCEPT_LANGUAGE).unwrap(), "de-DE");
}

#[test]
fn filter_headers_empty_input() {
    assert!(filter_headers(&HeaderMap::new()).is_empty());
}

#[test]
fn endpoint_url_joins_base_and_endpoint() {
    let fwd = Forwarder::new("http://backend:8000/").unwrap();
    assert_eq!(fwd.base_url(), "http://backend:8000");
    assert_eq!(fwd.endpoint_url("v1/jobs"), "http://backend:8000/api/v1/jobs");
    assert_eq!(fwd.endpoint_url("/v1/jobs"), "http://backend:8000/api/v1/jobs");
}

#[test]
fn error_accessors() {
    let err = ForwardError::Backend { status: 404, body: json!({ "message": "Job not found" }) };
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), Some("Job not found"));

    let err = ForwardError::Backend { status: 500, body: Value::Null };
    assert_eq!(err.message(), None);

    let err = ForwardError::Transport("refused".into());
    assert_eq!(err.status(), None);
    assert_eq!(err.message(), None);
}

// =============================================================================
// forward
// =============================================================================

#[tokio::test]
async fn forward_sends_query_and_whitelisted_headers() {
    let fwd = forwarder().await;
    let mut req = get("v1/jobs");
    req.headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {TEST_TOKEN}")).unwrap());
    req.headers.insert("cookie", HeaderValue::from_static("token=abc123"));
    req.query = vec![("page".into(), "2".into())];

    let Forwarded { status, body } = fwd.forward(req).await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["name"], "Backend Engineer");
    assert_eq!(body["echo"]["query"], "page=2");
    assert_eq!(body["echo"]["authorization"], "Bearer abc123");
    assert_eq!(body["echo"]["cookie"], Value::Null);
}

#[tokio::test]
async fn forward_posts_json_body() {
    let fwd = forwarder().await;
    let req = ForwardRequest {
        method: Method::POST,
        endpoint: "v1/auth/login".into(),
        body: Some(json!({ "email": "hello@gmail.com", "password": "HelloApiV1" })),
        ..ForwardRequest::default()
    };
    assert_eq!(fwd.forward(req).await.unwrap(), Forwarded { status: 200, body: json!({ "token": "abc123" }) });
}

#[tokio::test]
async fn forward_backend_error_keeps_status_and_message() {
    let fwd = forwarder().await;
    let req = ForwardRequest {
        method: Method::POST,
        endpoint: "v1/auth/login".into(),
        body: Some(json!({ "email": "hello@gmail.com", "password": "wrong" })),
        ..ForwardRequest::default()
    };
    let err = fwd.forward(req).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn forward_non_json_error_body_has_no_message() {
    let err = forwarder().await.forward(get("v1/broken")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), None);
}

#[tokio::test]
async fn forward_empty_success_body_is_null() {
    let fwd = forwarder().await;
    let req = ForwardRequest { method: Method::POST, endpoint: "v1/auth/logout".into(), ..ForwardRequest::default() };
    assert_eq!(fwd.forward(req).await.unwrap(), Forwarded { status: 204, body: Value::Null });
}

#[tokio::test]
async fn forward_keeps_success_status() {
    let fwd = forwarder().await;
    let mut req = ForwardRequest {
        method: Method::POST,
        endpoint: "v1/jobs".into(),
        body: Some(json!({ "name": "Platform Engineer" })),
        ..ForwardRequest::default()
    };
    req.headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {TEST_TOKEN}")).unwrap());

    let forwarded = fwd.forward(req).await.unwrap();
    assert_eq!(forwarded.status, 201);
    assert_eq!(forwarded.body, json!({ "id": 7, "name": "Platform Engineer" }));
}

#[tokio::test]
async fn forward_non_json_success_body_is_decode_error() {
    let err = forwarder().await.forward(get("v1/plain")).await.unwrap_err();
    assert!(matches!(err, ForwardError::Decode(_)));
}

#[tokio::test]
async fn forward_unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fwd = Forwarder::new(&format!("http://{addr}")).unwrap();
    let err = fwd.forward(get("v1/jobs")).await.unwrap_err();
    assert!(matches!(err, ForwardError::Transport(_)));
    assert_eq!(err.status(), None);
}
