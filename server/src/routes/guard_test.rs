use super::*;
use crate::state::test_helpers::send;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::LOCATION};
use axum::middleware;
use axum::routing::get;

fn pages() -> Router {
    Router::new()
        .route("/login", get(|| async { "login form" }))
        .route("/dashboard", get(|| async { "dashboard" }))
        .route("/about", get(|| async { "about" }))
        .layer(middleware::from_fn(page_guard))
}

fn page(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn dashboard_without_token_redirects_to_login() {
    let (status, headers, _) = send(pages(), page("/dashboard", None)).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn dashboard_with_empty_token_redirects_to_login() {
    let (status, headers, _) = send(pages(), page("/dashboard", Some("token="))).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn dashboard_with_token_renders() {
    let (status, _, body) = send(pages(), page("/dashboard", Some("token=abc123; user_email=a@b.com"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "dashboard");
}

#[tokio::test]
async fn login_with_token_redirects_to_dashboard() {
    let (status, headers, _) = send(pages(), page("/login", Some("token=abc123"))).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(LOCATION).unwrap(), "/dashboard");
}

#[tokio::test]
async fn login_without_token_renders() {
    let (status, _, body) = send(pages(), page("/login", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "login form");
}

#[tokio::test]
async fn unguarded_path_renders_either_way() {
    let (status, _, _) = send(pages(), page("/about", None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(pages(), page("/about", Some("token=abc123"))).await;
    assert_eq!(status, StatusCode::OK);
}
