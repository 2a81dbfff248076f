//! Cookie-backed credential storage for the session token and user email.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session state machine writes here on login and clears on logout; the
//! API client reads the token before every request; the server-side route
//! guard reads the same `token` cookie from request headers.
//!
//! TRADE-OFFS
//! ==========
//! Cookies are written from script, so they cannot be `HttpOnly`. Both entries
//! share one attribute set (one-day `Max-Age`, `Path=/`, `SameSite=Strict`,
//! `Secure` on https pages) so they expire together.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::cell::RefCell;
use std::collections::BTreeMap;

use cookie::{Cookie, SameSite};
use thiserror::Error;
use time::Duration;

pub const TOKEN_COOKIE: &str = "token";
pub const EMAIL_COOKIE: &str = "user_email";
const PROBE_COOKIE: &str = "test_cookie";
const PROBE_VALUE: &str = "test_value";

/// Lifetime of both credential cookies.
pub const CREDENTIAL_TTL: Duration = Duration::days(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The storage medium refused the write (no document, cookies disabled).
    #[error("cookie storage is unavailable")]
    Unavailable,

    /// The write appeared to succeed but the token could not be read back.
    #[error("token could not be saved to cookies")]
    NotPersisted,
}

/// Token and email as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub email: String,
}

/// Persistence contract for the session credentials.
pub trait CredentialStore {
    /// Persist `token` and `email` together, replacing any previous token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the medium rejects the write or the token
    /// cannot be read back afterwards.
    fn set(&self, token: &str, email: &str) -> Result<(), StoreError>;

    /// Current credentials, or `None` when no token is stored.
    fn get(&self) -> Option<Credentials>;

    /// Remove both entries.
    fn clear(&self);
}

/// A `document.cookie`-like medium.
///
/// `read` returns every visible cookie as `a=1; b=2`. `write` accepts a single
/// `Set-Cookie`-style assignment including attributes.
pub trait CookieBackend {
    fn read(&self) -> String;

    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the medium cannot be written.
    fn write(&self, assignment: &str) -> Result<(), StoreError>;
}

/// Credential store that keeps `token` and `user_email` as cookies.
#[derive(Debug, Clone)]
pub struct CookieStore<B> {
    backend: B,
    secure: bool,
}

impl<B: CookieBackend> CookieStore<B> {
    /// `secure` should be `true` when the page itself was served over https.
    pub fn new(backend: B, secure: bool) -> Self {
        Self { backend, secure }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up a single cookie value by name.
    pub fn lookup(&self, name: &str) -> Option<String> {
        Cookie::split_parse(self.backend.read())
            .filter_map(Result::ok)
            .find(|c| c.name() == name)
            .map(|c| c.value().to_owned())
    }

    /// Check whether the medium accepts cookies at all by writing, reading back,
    /// and removing a throwaway entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the probe cookie cannot be written or read back.
    pub fn probe(&self) -> Result<(), StoreError> {
        self.backend
            .write(&set_assignment(PROBE_COOKIE, PROBE_VALUE, self.secure))?;
        let seen = self.lookup(PROBE_COOKIE);
        let _ = self.backend.write(&remove_assignment(PROBE_COOKIE));
        if seen.as_deref() == Some(PROBE_VALUE) {
            Ok(())
        } else {
            Err(StoreError::NotPersisted)
        }
    }
}

impl<B: CookieBackend> CredentialStore for CookieStore<B> {
    fn set(&self, token: &str, email: &str) -> Result<(), StoreError> {
        self.backend.write(&remove_assignment(TOKEN_COOKIE))?;
        self.backend
            .write(&set_assignment(TOKEN_COOKIE, token, self.secure))?;
        self.backend
            .write(&set_assignment(EMAIL_COOKIE, email, self.secure))?;

        match self.lookup(TOKEN_COOKIE) {
            Some(saved) if saved == token => Ok(()),
            _ => Err(StoreError::NotPersisted),
        }
    }

    fn get(&self) -> Option<Credentials> {
        let token = self.lookup(TOKEN_COOKIE).filter(|t| !t.is_empty())?;
        let email = self.lookup(EMAIL_COOKIE).unwrap_or_default();
        Some(Credentials { token, email })
    }

    fn clear(&self) {
        for name in [TOKEN_COOKIE, EMAIL_COOKIE] {
            if let Err(e) = self.backend.write(&remove_assignment(name)) {
                log::warn!("failed to clear cookie {name}: {e}");
            }
        }
    }
}

/// Format a cookie assignment carrying the shared credential attributes.
pub fn set_assignment(name: &str, value: &str, secure: bool) -> String {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(CREDENTIAL_TTL)
        .build()
        .to_string()
}

/// Format an assignment that expires `name` immediately.
pub fn remove_assignment(name: &str) -> String {
    Cookie::build((name, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

// =============================================================================
// IN-MEMORY MEDIUM
// =============================================================================

/// Process-local cookie jar with `document.cookie` semantics.
///
/// Used when rendering on the server and in tests. A disabled jar rejects every
/// write, like a browser with cookies blocked by policy.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    jar: RefCell<BTreeMap<String, String>>,
    writes: RefCell<Vec<String>>,
    disabled: bool,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self { disabled: true, ..Self::default() }
    }

    /// Every assignment accepted so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl CookieBackend for MemoryCookies {
    fn read(&self) -> String {
        self.jar
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, assignment: &str) -> Result<(), StoreError> {
        if self.disabled {
            return Err(StoreError::Unavailable);
        }
        let parsed = Cookie::parse(assignment.to_owned()).map_err(|_| StoreError::Unavailable)?;
        let expired = parsed.max_age().is_some_and(|age| age <= Duration::ZERO);
        let mut jar = self.jar.borrow_mut();
        if expired {
            jar.remove(parsed.name());
        } else {
            jar.insert(parsed.name().to_owned(), parsed.value().to_owned());
        }
        self.writes.borrow_mut().push(assignment.to_owned());
        Ok(())
    }
}

// =============================================================================
// BROWSER MEDIUM
// =============================================================================

/// The page's own `document.cookie`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

#[cfg(feature = "hydrate")]
impl DocumentCookies {
    fn document() -> Option<web_sys::HtmlDocument> {
        use wasm_bindgen::JsCast;
        web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()
    }
}

#[cfg(feature = "hydrate")]
impl CookieBackend for DocumentCookies {
    fn read(&self) -> String {
        Self::document()
            .and_then(|doc| doc.cookie().ok())
            .unwrap_or_default()
    }

    fn write(&self, assignment: &str) -> Result<(), StoreError> {
        let doc = Self::document().ok_or(StoreError::Unavailable)?;
        doc.set_cookie(assignment)
            .map_err(|_| StoreError::Unavailable)
    }
}

/// Whether the current page was served over https.
#[cfg(feature = "hydrate")]
pub fn page_is_secure() -> bool {
    web_sys::window()
        .and_then(|w| w.location().protocol().ok())
        .is_some_and(|p| p == "https:")
}

/// Credential store over the page's cookies.
#[cfg(feature = "hydrate")]
pub fn browser_store() -> CookieStore<DocumentCookies> {
    CookieStore::new(DocumentCookies, page_is_secure())
}
