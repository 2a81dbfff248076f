//! Top bar with the signed-in identity and a logout button.

use leptos::prelude::*;

use crate::state::session::use_session;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();

    let email = move || {
        session
            .user()
            .map(|u| u.email)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "signed in".to_owned())
    };

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let api = crate::net::api::browser_client();
            crate::state::session::sign_out(&session.state, &api).await;
        });
    };

    view! {
        <header class="navbar toolbar">
            <span class="toolbar__title">"Jobdesk"</span>
            <span class="toolbar__spacer"></span>
            <span class="toolbar__self">{email}</span>
            <button class="btn toolbar__logout" on:click=on_logout title="Logout">
                "Logout"
            </button>
        </header>
    }
}
