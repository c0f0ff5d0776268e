//! Server-side session table.
//!
//! Maps an opaque random token (held by the browser in an HTTP-only cookie)
//! to the identity the provider returned at sign-in.

use std::collections::HashMap;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use cookie::time;
use tokio::sync::RwLock;
use uuid::Uuid;

use agro_common::session::SessionUser;

use crate::auth::ProviderSession;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "agro_session";

/// Sessions expire after 24 hours.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct StoredSession {
    pub user: SessionUser,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) >= Duration::hours(SESSION_TTL_HOURS)
    }
}

/// In-memory session store, cheap to clone.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh session and return its token.
    pub async fn create(&self, session: ProviderSession) -> String {
        let token = Uuid::new_v4().to_string();
        let stored = StoredSession {
            user: session.user,
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), stored);
        token
    }

    /// Look up a live session.
    pub async fn get(&self, token: &str) -> Option<StoredSession> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if session.expired_at(Utc::now()) {
            return None;
        }
        Some(session.clone())
    }

    /// Forget a session (sign-out).  Unknown tokens are ignored.
    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop expired sessions.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|_, s| !s.expired_at(now));
        before - sessions.len()
    }

    #[cfg(test)]
    async fn backdate(&self, token: &str, hours: i64) {
        if let Some(s) = self.sessions.write().await.get_mut(token) {
            s.created_at -= Duration::hours(hours);
        }
    }
}

/// Session token carried by the request's cookies, if any.
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value_trimmed().to_string())
        .filter(|v| !v.is_empty())
}

/// Cookie installing `token` for the session lifetime.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build()
}

/// Cookie telling the browser to drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::*;

    fn provider_session() -> ProviderSession {
        ProviderSession {
            user: SessionUser {
                user_id: "u1".into(),
                email: "grower@farm.example".into(),
            },
            id_token: "id-token".into(),
        }
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let token = store.create(provider_session()).await;

        let session = store.get(&token).await.unwrap();
        assert_eq!(session.user.email, "grower@farm.example");

        store.remove(&token).await;
        assert!(store.get(&token).await.is_none());
        assert!(store.get("unknown").await.is_none());
    }

    #[tokio::test]
    async fn test_expiry() {
        let store = SessionStore::new();
        let old = store.create(provider_session()).await;
        let fresh = store.create(provider_session()).await;
        store.backdate(&old, SESSION_TTL_HOURS).await;

        assert!(store.get(&old).await.is_none());
        assert_eq!(store.cleanup_expired().await, 1);
        assert!(store.get(&fresh).await.is_some());
    }

    fn jar(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_token_from_jar() {
        let plain = format!("theme=dark; {SESSION_COOKIE}=abc-123; other=1");
        assert_eq!(token_from_jar(&jar(&plain)).as_deref(), Some("abc-123"));

        let quoted = format!("{SESSION_COOKIE}=\"abc-123\"");
        assert_eq!(token_from_jar(&jar(&quoted)).as_deref(), Some("abc-123"));

        assert_eq!(token_from_jar(&jar("theme=dark")), None);
        assert_eq!(token_from_jar(&jar(&format!("{SESSION_COOKIE}="))), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let set = session_cookie("t".into()).to_string();
        assert!(set.starts_with("agro_session=t"));
        for attr in ["HttpOnly", "SameSite=Lax", "Path=/", "Max-Age=86400"] {
            assert!(set.contains(attr), "{set} lacks {attr}");
        }

        let removal = removal_cookie().to_string();
        assert!(removal.starts_with("agro_session=;"));
        assert!(removal.contains("Max-Age=0"));
        assert!(removal.contains("Path=/"));
    }
}
