//! Typed per-browser session state.
//!
//! Sessions live in an in-process map keyed by an opaque random id carried
//! in an HttpOnly cookie. Every read/write is an explicit field access on
//! the `Session` struct; nothing here is persisted to the registrant store.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::state::AppState;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "giveaway_session";

/// Per-browser session state.
#[derive(Debug, Clone)]
pub struct Session {
    /// Token captured by the redirect handler, consumed by registration.
    pub pending_referral: Option<String>,
    /// Set by admin login, cleared by logout.
    pub admin: bool,
    /// Anti-forgery value required on state-mutating form submissions.
    pub csrf_token: String,
}

impl Session {
    fn new() -> Self {
        Self {
            pending_referral: None,
            admin: false,
            csrf_token: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// In-process session map shared across requests.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh anonymous session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().unwrap().insert(id, Session::new());
        id
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.inner.read().unwrap().contains_key(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<Session> {
        self.inner.read().unwrap().get(id).cloned()
    }

    /// The session's anti-forgery token, or empty for an unknown session.
    pub fn csrf_token(&self, id: &Uuid) -> String {
        self.get(id).map(|s| s.csrf_token).unwrap_or_default()
    }

    /// Whether a submitted anti-forgery token matches the session's.
    pub fn csrf_matches(&self, id: &Uuid, token: &str) -> bool {
        !token.is_empty() && self.get(id).is_some_and(|s| s.csrf_token == token)
    }

    pub fn is_admin(&self, id: &Uuid) -> bool {
        self.get(id).is_some_and(|s| s.admin)
    }

    pub fn set_admin(&self, id: &Uuid, admin: bool) {
        if let Some(session) = self.inner.write().unwrap().get_mut(id) {
            session.admin = admin;
        }
    }

    /// Overwrite the pending referral token (last click wins).
    pub fn set_pending_referral(&self, id: &Uuid, token: String) {
        if let Some(session) = self.inner.write().unwrap().get_mut(id) {
            session.pending_referral = Some(token);
        }
    }

    /// Read-and-clear the pending referral token.
    pub fn take_pending_referral(&self, id: &Uuid) -> Option<String> {
        self.inner
            .write()
            .unwrap()
            .get_mut(id)
            .and_then(|session| session.pending_referral.take())
    }
}

/// Request extension carrying the resolved session id.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);

/// Middleware that resolves (or creates) the browser's session and exposes
/// its id to handlers. A Set-Cookie header is attached only when a new
/// session was minted.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_session_cookie)
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .filter(|id| state.sessions().contains(id));

    let (id, created) = match existing {
        Some(id) => (id, false),
        None => (state.sessions().create(), true),
    };

    request.extensions_mut().insert(SessionId(id));
    let mut response = next.run(request).await;

    if created {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(id)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Extract session cookie value from cookie header
fn extract_session_cookie(cookies: &str) -> Option<String> {
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE_NAME)) {
            return Some(value.to_string());
        }
    }
    None
}

fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_session_cookie() {
        let id = "6c0f52cc-5b9d-4af1-a20e-2f5f3b1a9a11";
        let header = format!("theme=dark; {SESSION_COOKIE_NAME}={id}; lang=en");
        assert_eq!(extract_session_cookie(&header).as_deref(), Some(id));
        assert_eq!(extract_session_cookie("theme=dark"), None);
    }

    #[test]
    fn test_fresh_session_is_anonymous() {
        let store = SessionStore::new();
        let id = store.create();
        assert!(store.contains(&id));
        assert!(!store.is_admin(&id));
        assert!(store.take_pending_referral(&id).is_none());
        assert!(!store.csrf_token(&id).is_empty());
    }

    #[test]
    fn test_pending_referral_last_click_wins() {
        let store = SessionStore::new();
        let id = store.create();

        store.set_pending_referral(&id, "first".to_string());
        store.set_pending_referral(&id, "second".to_string());

        // take clears the slot.
        assert_eq!(store.take_pending_referral(&id).as_deref(), Some("second"));
        assert!(store.take_pending_referral(&id).is_none());
    }

    #[test]
    fn test_admin_flag_round_trip() {
        let store = SessionStore::new();
        let id = store.create();

        store.set_admin(&id, true);
        assert!(store.is_admin(&id));
        store.set_admin(&id, false);
        assert!(!store.is_admin(&id));
    }

    #[test]
    fn test_csrf_matches() {
        let store = SessionStore::new();
        let id = store.create();
        let token = store.csrf_token(&id);

        assert!(store.csrf_matches(&id, &token));
        assert!(!store.csrf_matches(&id, "forged"));
        assert!(!store.csrf_matches(&id, ""));
        assert!(!store.csrf_matches(&Uuid::new_v4(), &token));
    }
}
