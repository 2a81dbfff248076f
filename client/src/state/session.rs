//! Session state machine for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the root `App` component as a [`SessionContext`] and handed to the
//! login and dashboard pages through Leptos context. Drives the login form's
//! error line, the navbar identity, and the redirect-to-login behavior when
//! the API reports 401.
//!
//! STATES
//! ======
//! `Unknown` until the credential store has been read once, then
//! `Authenticated` or `Unauthenticated`. Token presence alone decides; the
//! token is never checked with the backend.
//!
//! INVARIANT
//! =========
//! `user` is `Some` only while the credential store holds a token. Every
//! transition that touches one touches the other.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use serde_json::Value;
use thiserror::Error;

use crate::net::api::{ApiClient, ApiError, HttpTransport};
use crate::net::types::User;
use crate::util::credentials::{CredentialStore, StoreError};

pub const GENERIC_LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";

/// Response shapes tried, in order, when looking for the issued token.
const TOKEN_PATHS: [&[&str]; 3] = [&["token"], &["data", "token"], &["access_token"]];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The backend accepted the credentials but no token field was present.
    #[error("Login successful, but no access token was found. Please contact the administrator.")]
    TokenMissing,

    /// A token field was present but empty or not a string.
    #[error("Invalid access token received. Please contact the administrator.")]
    TokenInvalid,

    #[error("Failed to save the authentication token in the browser. Please check your browser settings.")]
    Storage(#[source] StoreError),

    /// The login request itself failed.
    #[error("{}", login_failure_message(.0))]
    Request(ApiError),
}

fn login_failure_message(err: &ApiError) -> String {
    err.server_message()
        .unwrap_or(GENERIC_LOGIN_FAILURE)
        .to_owned()
}

/// Pull the session token out of a login response.
///
/// Tries top-level `token`, then `data.token`, then `access_token`. Only a
/// non-empty string counts; a field that exists with any other value is
/// skipped and reported as [`LoginError::TokenInvalid`] if nothing better is
/// found.
///
/// # Errors
///
/// Returns [`LoginError::TokenMissing`] or [`LoginError::TokenInvalid`].
pub fn extract_token(body: &Value) -> Result<String, LoginError> {
    let mut saw_invalid = false;
    for path in TOKEN_PATHS {
        let Some(found) = path.iter().try_fold(body, |v, key| v.get(*key)) else {
            continue;
        };
        match found.as_str() {
            Some(token) if !token.is_empty() => return Ok(token.to_owned()),
            _ => saw_invalid = true,
        }
    }
    Err(if saw_invalid { LoginError::TokenInvalid } else { LoginError::TokenMissing })
}

/// Ticket identifying one login attempt. Completions carrying a stale ticket
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginAttempt(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Failed(LoginError),
    /// A newer login or a logout happened while this attempt was in flight.
    Superseded,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub user: Option<User>,
    /// A login request is in flight.
    pub loading: bool,
    /// User-visible message from the last failed login.
    pub error: Option<String>,
    attempt: u64,
}

impl SessionState {
    /// Whether the initial credential read has happened.
    pub fn is_settled(&self) -> bool {
        self.status != SessionStatus::Unknown
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Leave `Unknown` based on what the credential store holds. Later calls
    /// are no-ops.
    pub fn init(&mut self, store: &impl CredentialStore) {
        if self.is_settled() {
            return;
        }
        match store.get() {
            Some(creds) => {
                log::debug!("session: token found at startup");
                self.status = SessionStatus::Authenticated;
                self.user = Some(User { email: creds.email });
            }
            None => {
                log::debug!("session: no token at startup");
                self.status = SessionStatus::Unauthenticated;
                self.user = None;
            }
        }
    }

    /// Start a login attempt, superseding any attempt still in flight.
    pub fn begin_login(&mut self) -> LoginAttempt {
        self.attempt += 1;
        self.loading = true;
        self.error = None;
        LoginAttempt(self.attempt)
    }

    /// Apply the result of the login request started by `attempt`.
    pub fn finish_login(
        &mut self,
        attempt: LoginAttempt,
        email: &str,
        response: Result<Value, ApiError>,
        store: &impl CredentialStore,
    ) -> LoginOutcome {
        if attempt.0 != self.attempt {
            log::debug!("session: dropping superseded login attempt {}", attempt.0);
            return LoginOutcome::Superseded;
        }
        self.loading = false;

        match persist_login(email, response, store) {
            Ok(user) => {
                self.status = SessionStatus::Authenticated;
                self.user = Some(user);
                self.error = None;
                LoginOutcome::Authenticated
            }
            Err(err) => {
                log::warn!("session: login failed: {err}");
                if store.get().is_none() {
                    self.status = SessionStatus::Unauthenticated;
                    self.user = None;
                }
                self.error = Some(err.to_string());
                LoginOutcome::Failed(err)
            }
        }
    }

    /// Clear credentials and identity. Any login still in flight is superseded.
    pub fn logout(&mut self, store: &impl CredentialStore) {
        store.clear();
        self.attempt += 1;
        self.status = SessionStatus::Unauthenticated;
        self.user = None;
        self.loading = false;
        self.error = None;
    }

    /// React to a 401 from a data call: the stored token is no longer good.
    pub fn handle_unauthorized(&mut self, store: &impl CredentialStore) {
        if self.is_authenticated() {
            log::info!("session: token rejected by the API; signing out");
        }
        self.logout(store);
    }
}

fn persist_login(email: &str, response: Result<Value, ApiError>, store: &impl CredentialStore) -> Result<User, LoginError> {
    let body = response.map_err(LoginError::Request)?;
    let token = extract_token(&body)?;
    if let Err(err) = store.set(&token, email) {
        store.clear();
        return Err(LoginError::Storage(err));
    }
    match store.get() {
        Some(saved) if saved.token == token => Ok(User { email: email.to_owned() }),
        _ => {
            store.clear();
            Err(LoginError::Storage(StoreError::NotPersisted))
        }
    }
}

// =============================================================================
// ASYNC FLOWS
// =============================================================================

/// Somewhere a [`SessionState`] lives and can be mutated in place.
pub trait SessionCell {
    /// Apply `f`, or return `None` if the state is gone.
    fn modify<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R>;
}

impl SessionCell for RwSignal<SessionState> {
    fn modify<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        self.try_update(f)
    }
}

/// Log in with `email` and `password`, persisting the issued token.
pub async fn login<C, T, S>(cell: &C, api: &ApiClient<T, S>, email: &str, password: &str) -> LoginOutcome
where
    C: SessionCell,
    T: HttpTransport,
    S: CredentialStore,
{
    let Some(attempt) = cell.modify(SessionState::begin_login) else {
        return LoginOutcome::Superseded;
    };
    let response = api.login(email, password).await;
    cell.modify(|s| s.finish_login(attempt, email, response, api.store()))
        .unwrap_or(LoginOutcome::Superseded)
}

/// Tell the backend about the logout, then clear local credentials whatever
/// the backend said.
pub async fn sign_out<C, T, S>(cell: &C, api: &ApiClient<T, S>)
where
    C: SessionCell,
    T: HttpTransport,
    S: CredentialStore,
{
    if let Err(e) = api.logout().await {
        log::warn!("session: backend logout failed: {e}");
    }
    cell.modify(|s| s.logout(api.store()));
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Session handle provided to the view tree by the root component.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: RwSignal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self { state: RwSignal::new(SessionState::default()) }
    }

    /// Read the credential store once. Call on first render in the browser.
    pub fn init(&self, store: &impl CredentialStore) {
        self.state.update(|s| s.init(store));
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn handle_unauthorized(&self, store: &impl CredentialStore) {
        self.state.update(|s| s.handle_unauthorized(store));
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the session handle installed by `App`.
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
