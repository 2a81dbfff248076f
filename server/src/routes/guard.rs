//! Server-side navigation guard for page requests.
//!
//! Runs before Leptos renders `/login` or `/dashboard`, so a signed-out
//! visitor never sees dashboard markup and a signed-in one never sees the
//! login form. Only the presence of the token cookie is checked.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use client::util::credentials::TOKEN_COOKIE;
use client::util::route_guard::evaluate;

pub async fn page_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let has_token = jar.get(TOKEN_COOKIE).is_some_and(|c| !c.value().is_empty());
    let path = request.uri().path().to_owned();
    match evaluate(&path, has_token).location() {
        Some(location) => {
            tracing::debug!(%path, %location, "route guard redirect");
            Redirect::temporary(location).into_response()
        }
        None => next.run(request).await,
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
