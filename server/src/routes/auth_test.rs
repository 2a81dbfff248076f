use super::*;
use crate::routes::api_routes;
use crate::state::test_helpers::{TEST_EMAIL, TEST_PASSWORD, send, test_app_state, unreachable_app_state};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

fn login_request(body: &Value) -> Request<Body> {
    Request::post("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn login_returns_backend_token() {
    let app = api_routes(test_app_state().await);
    let (status, _, body) = send(app, login_request(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "token": "abc123" }));
}

#[tokio::test]
async fn login_failure_relays_backend_status_and_message() {
    let app = api_routes(test_app_state().await);
    let (status, _, body) = send(app, login_request(&json!({ "email": TEST_EMAIL, "password": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn login_unreachable_backend_is_generic_500() {
    let app = api_routes(unreachable_app_state().await);
    let (status, _, body) = send(app, login_request(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": LOGIN_FAILURE }));
}

#[tokio::test]
async fn non_post_login_falls_through_to_passthrough() {
    // The fake backend only accepts POST, so the passthrough relays its 405.
    let app = api_routes(test_app_state().await);
    let (status, _, body) =
        send(app, Request::get("/api/v1/auth/login").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "message": "Request failed" }));
}

#[tokio::test]
async fn login_malformed_body_answers_with_message() {
    let app = api_routes(test_app_state().await);
    let request = Request::post("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": LOGIN_FAILURE }));
}

#[tokio::test]
async fn login_without_content_type_is_still_forwarded() {
    let app = api_routes(test_app_state().await);
    let payload = json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD });
    let request = Request::post("/api/v1/auth/login").body(Body::from(payload.to_string())).unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "token": "abc123" }));
}

#[tokio::test]
async fn login_empty_body_answers_with_message() {
    let app = api_routes(test_app_state().await);
    let (status, _, body) = send(app, Request::post("/api/v1/auth/login").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": LOGIN_FAILURE }));
}
