//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the request forwarder, whose HTTP client is internally reference
//! counted, so cloning per request is cheap.

use crate::services::forward::Forwarder;

#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
}

impl AppState {
    #[must_use]
    pub fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }
}
