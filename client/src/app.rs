//! Root application component with routing and the session provider.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::pages::{dashboard::DashboardPage, login::LoginPage};
use crate::state::session::SessionContext;
use crate::util::route_guard::DASHBOARD_PATH;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Constructs the session context, reads the credential cookies once in the
/// browser, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionContext::new();
    provide_context(session);

    // Effects only run in the browser, where the cookies live.
    Effect::new(move || {
        #[cfg(feature = "hydrate")]
        session.init(&crate::util::credentials::browser_store());
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/jobdesk.css"/>
        <Title text="Jobdesk"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=DASHBOARD_PATH/> }/>
            </Routes>
        </Router>
    }
}
