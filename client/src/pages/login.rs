//! Login page with an email + password form.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::use_session;
use crate::util::auth::install_route_guard;
use crate::util::route_guard::LOGIN_PATH;

fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Login page. A successful login flips the session to authenticated and the
/// route guard moves the user on to the dashboard.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    install_route_guard(session, LOGIN_PATH, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<String>);
    let busy = move || session.state.with(|s| s.loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                form_error.set(Some(msg.to_owned()));
                return;
            }
        };
        form_error.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let api = crate::net::api::browser_client();
            let outcome = crate::state::session::login(&session.state, &api, &email_value, &password_value).await;
            log::debug!("login finished: {outcome:?}");
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (email_value, password_value);
    };

    let message = move || form_error.get().or_else(|| session.state.with(|s| s.error.clone()));

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=busy>
                        {move || if busy() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || message().is_some()>
                    <p class="login-message login-message--error">{move || message().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
