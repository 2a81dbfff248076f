//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server guards full page loads; pages install the same rule here so
//! client-side navigations and mid-session sign-outs redirect identically.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{SessionContext, SessionState};
use crate::util::route_guard;

/// Where `path` should send the user given the current session, if anywhere.
///
/// Nothing redirects until the session has been read from storage.
pub fn guard_redirect(state: &SessionState, path: &str) -> Option<&'static str> {
    if !state.is_settled() {
        return None;
    }
    route_guard::evaluate(path, state.is_authenticated()).location()
}

/// Re-evaluate the route guard for `path` whenever the session changes.
pub fn install_route_guard<F>(session: SessionContext, path: &'static str, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let target = session.state.with(|s| guard_redirect(s, path));
        if let Some(target) = target {
            navigate(target, NavigateOptions::default());
        }
    });
}
