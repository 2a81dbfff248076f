//! Dashboard page listing the signed-in user's jobs.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It fetches the job list once the
//! session is known to be authenticated, and hands a 401 back to the session
//! so the route guard can send the user to `/login`.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::navbar::Navbar;
use crate::components::storage_debug::StorageDebug;
use crate::state::jobs::JobsState;
use crate::state::session::{SessionState, use_session};
use crate::util::auth::install_route_guard;
use crate::util::route_guard::DASHBOARD_PATH;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    install_route_guard(session, DASHBOARD_PATH, use_navigate());

    let jobs = RwSignal::new(JobsState { loading: true, ..JobsState::default() });

    let refresh = move || {
        jobs.update(JobsState::begin_fetch);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let api = crate::net::api::browser_client();
            let result = api.list_jobs(&[]).await;
            let outcome = jobs.try_update(|s| s.finish_fetch(result));
            if outcome == Some(crate::state::jobs::FetchOutcome::Unauthorized) {
                session.handle_unauthorized(api.store());
            }
        });
    };

    // Fetch once, as soon as the session is known to be authenticated.
    let requested = RwSignal::new(false);
    Effect::new(move || {
        if requested.get_untracked() {
            return;
        }
        if session.state.with(SessionState::is_authenticated) {
            requested.set(true);
            refresh();
        }
    });

    view! {
        <Show
            when=move || session.state.with(SessionState::is_authenticated)
            fallback=move || {
                view! {
                    <div class="dashboard-page">
                        <p>
                            {move || {
                                if session.state.with(SessionState::is_settled) {
                                    "Redirecting to login..."
                                } else {
                                    "Loading..."
                                }
                            }}
                        </p>
                    </div>
                }
            }
        >
            <Navbar/>
            <div class="dashboard-page">
                <h1 class="dashboard-page__title">"Job List"</h1>

                <Show when=move || jobs.with(|j| j.error.is_some())>
                    <p class="dashboard-page__error">{move || jobs.with(|j| j.error.clone().unwrap_or_default())}</p>
                </Show>

                <Show
                    when=move || !jobs.with(|j| j.loading)
                    fallback=move || view! { <p class="dashboard-page__loading">"Loading jobs..."</p> }
                >
                    {move || {
                        let items = jobs.with(|j| j.items.clone());
                        if items.is_empty() {
                            view! { <p class="dashboard-page__empty">"No jobs found."</p> }.into_any()
                        } else {
                            view! {
                                <ul class="job-list">
                                    {items
                                        .into_iter()
                                        .map(|job| {
                                            view! {
                                                <li class="job-list__item">
                                                    <span class="job-list__name">{job.name}</span>
                                                    <span class="job-list__id">{format!("ID: {}", job.id)}</span>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            }
                                .into_any()
                        }
                    }}
                </Show>

                <button class="btn dashboard-page__refresh" on:click=move |_| refresh()>
                    "Refresh"
                </button>

                <StorageDebug/>
            </div>
        </Show>
    }
}
