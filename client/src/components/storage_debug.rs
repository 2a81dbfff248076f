//! Cookie diagnostics panel.
//!
//! Shows whether the credential cookies are present and lets the user check
//! that the browser accepts cookies at all, which is the usual cause of a
//! login that succeeds on the backend but never sticks.

#[cfg(test)]
#[path = "storage_debug_test.rs"]
mod storage_debug_test;

use leptos::prelude::*;

#[cfg(any(test, feature = "hydrate"))]
use crate::util::credentials::StoreError;
#[cfg(feature = "hydrate")]
use crate::util::credentials::{EMAIL_COOKIE, TOKEN_COOKIE};

#[cfg(any(test, feature = "hydrate"))]
const PREVIEW_CHARS: usize = 20;
const NOT_SET: &str = "Not set";

/// Render a cookie value for display, truncated so tokens are not shown whole.
#[cfg(any(test, feature = "hydrate"))]
fn preview_value(value: Option<&str>) -> String {
    match value {
        None | Some("") => NOT_SET.to_owned(),
        Some(v) if v.chars().count() > PREVIEW_CHARS => {
            format!("{}...", v.chars().take(PREVIEW_CHARS).collect::<String>())
        }
        Some(v) => v.to_owned(),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn probe_message(result: Result<(), StoreError>) -> String {
    match result {
        Ok(()) => "Cookie test passed: the browser can set and read cookies.".to_owned(),
        Err(e) => format!("Cookie test failed: {e}."),
    }
}

#[component]
pub fn StorageDebug() -> impl IntoView {
    let token = RwSignal::new(NOT_SET.to_owned());
    let email = RwSignal::new(NOT_SET.to_owned());
    let probe = RwSignal::new("Not tested".to_owned());

    let check = move || {
        #[cfg(feature = "hydrate")]
        {
            let store = crate::util::credentials::browser_store();
            token.set(preview_value(store.lookup(TOKEN_COOKIE).as_deref()));
            email.set(preview_value(store.lookup(EMAIL_COOKIE).as_deref()));
        }
    };
    Effect::new(move || check());

    let run_probe = move |_| {
        #[cfg(feature = "hydrate")]
        probe.set(probe_message(crate::util::credentials::browser_store().probe()));
        check();
    };

    view! {
        <section class="storage-debug">
            <h2 class="storage-debug__title">"Cookie status"</h2>
            <div class="storage-debug__actions">
                <button class="btn" on:click=move |_| check()>"Refresh status"</button>
                <button class="btn" on:click=run_probe>"Test cookies"</button>
            </div>
            <p class="storage-debug__result">{move || probe.get()}</p>
            <dl class="storage-debug__values">
                <dt>"token"</dt>
                <dd>{move || token.get()}</dd>
                <dt>"user_email"</dt>
                <dd>{move || email.get()}</dd>
            </dl>
        </section>
    }
}
