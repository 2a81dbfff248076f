//! # jobdesk-client
//!
//! Leptos + WASM front end for the job dashboard.
//!
//! This crate holds the pages, session state, credential storage, and the
//! authenticated REST client. The `ssr` build is rendered by the server
//! crate; the `hydrate` build runs in the browser.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: install logging and hydrate the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
