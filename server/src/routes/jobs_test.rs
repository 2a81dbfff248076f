use super::*;
use crate::routes::api_routes;
use crate::state::test_helpers::{send, test_app_state, unreachable_app_state};
use axum::body::Body;
use axum::http::Request;

#[tokio::test]
async fn list_jobs_forwards_query_and_authorization() {
    let app = api_routes(test_app_state().await);
    let request = Request::get("/api/v1/jobs?page=2")
        .header("authorization", "Bearer abc123")
        .header("cookie", "token=abc123")
        .header("x-custom", "1")
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{ "id": 1, "name": "Backend Engineer" }]));
    assert_eq!(body["echo"]["query"], "page=2");
    assert_eq!(body["echo"]["authorization"], "Bearer abc123");
    assert_eq!(body["echo"]["cookie"], serde_json::Value::Null);
    assert_eq!(body["echo"]["x_custom"], serde_json::Value::Null);
}

#[tokio::test]
async fn list_jobs_keeps_repeated_query_params_in_order() {
    let app = api_routes(test_app_state().await);
    let request = Request::get("/api/v1/jobs?tag=a&tag=b&page=1")
        .header("authorization", "Bearer abc123")
        .body(Body::empty())
        .unwrap();

    let (_, _, body) = send(app, request).await;
    assert_eq!(body["echo"]["query"], "tag=a&tag=b&page=1");
}

#[tokio::test]
async fn list_jobs_401_uses_fixed_message() {
    let app = api_routes(test_app_state().await);
    let request = Request::get("/api/v1/jobs").header("authorization", "Bearer stale").body(Body::empty()).unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": UNAUTHORIZED_MESSAGE }));
}

#[tokio::test]
async fn list_jobs_unreachable_backend_is_generic_500() {
    let app = api_routes(unreachable_app_state().await);
    let (status, _, body) = send(app, Request::get("/api/v1/jobs").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": JOBS_FAILURE }));
}

#[tokio::test]
async fn post_jobs_falls_through_and_keeps_created_status() {
    let app = api_routes(test_app_state().await);
    let request = Request::post("/api/v1/jobs")
        .header("authorization", "Bearer abc123")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Platform Engineer"}"#))
        .unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 7, "name": "Platform Engineer" }));
}
