//! Navigation guard for the login and dashboard routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Evaluated by the server middleware before rendering a page and by the
//! client after hydration. The decision depends only on the path and on
//! whether a token cookie is present; the token itself is never inspected.
//!
//! Matching is exact: `/dashboard/settings` is not guarded.

#[cfg(test)]
#[path = "route_guard_test.rs"]
mod route_guard_test;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a token.
    Protected,
    /// Only for visitors without a token.
    AuthOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GuardDecision {
    /// Target path for redirect decisions.
    pub fn location(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToDashboard => Some(DASHBOARD_PATH),
        }
    }
}

pub fn classify(path: &str) -> Option<RouteClass> {
    match path {
        DASHBOARD_PATH => Some(RouteClass::Protected),
        LOGIN_PATH => Some(RouteClass::AuthOnly),
        _ => None,
    }
}

pub fn evaluate(path: &str, has_token: bool) -> GuardDecision {
    match (classify(path), has_token) {
        (Some(RouteClass::Protected), false) => GuardDecision::RedirectToLogin,
        (Some(RouteClass::AuthOnly), true) => GuardDecision::RedirectToDashboard,
        _ => GuardDecision::Allow,
    }
}
