// src/utils/session.rs

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the cookie carrying the browsing-session id.
pub const SESSION_COOKIE: &str = "sid";

/// Sessions expire 14 days after creation.
const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 14);

/// Per-session state: which articles this session has already viewed.
///
/// This only exists to stop view counts from double-counting within one
/// browsing session. It is not persisted anywhere.
struct SessionEntry {
    viewed_articles: HashSet<i64>,
    expires_at: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            viewed_articles: HashSet::new(),
            expires_at: Instant::now() + SESSION_TTL,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

/// In-process store of browsing sessions, shared via `AppState`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

/// Request extension holding the current session id.
/// Injected by `session_middleware` for every request.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh session id, pruning expired entries on the way.
    ///
    /// Nothing is stored for the new id; `first_view` creates entries on
    /// demand, so a session that never views an article takes no memory.
    pub async fn mint_id(&self) -> String {
        self.inner.lock().await.retain(|_, entry| !entry.is_expired());
        Uuid::new_v4().simple().to_string()
    }

    /// Records that `session_id` has viewed `article_id`.
    ///
    /// Returns true only the first time this session views the article.
    /// Unknown or expired session ids (client kept a cookie across a restart
    /// or past the TTL) start over with an empty entry.
    pub async fn first_view(&self, session_id: &str, article_id: i64) -> bool {
        let mut sessions = self.inner.lock().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionEntry::new);
        if entry.is_expired() {
            *entry = SessionEntry::new();
        }
        entry.viewed_articles.insert(article_id)
    }
}

/// Axum Middleware: browsing sessions.
///
/// Reads the session cookie, minting a new id when the client has none, and
/// injects `SessionId` into the request extensions. Responses to cookie-less
/// clients get a Set-Cookie for the new id.
pub async fn session_middleware(
    State(sessions): State<SessionStore>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let (session_id, issued) = match session_id_from_headers(req.headers()) {
        Some(id) => (id, false),
        None => (sessions.mint_id().await, true),
    };

    req.extensions_mut().insert(SessionId(session_id.clone()));
    let mut response = next.run(req).await;

    if issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, session_id
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Extracts the session id from a Cookie header, if present.
fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mint_id_stores_nothing() {
        let store = SessionStore::new();
        let id = store.mint_id().await;

        assert!(!id.is_empty());
        assert_eq!(store.inner.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn first_view_marks_once_per_article() {
        let store = SessionStore::new();
        let id = store.mint_id().await;

        assert!(store.first_view(&id, 1).await);
        assert!(!store.first_view(&id, 1).await);
        assert!(store.first_view(&id, 2).await);
        assert_eq!(store.inner.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn first_view_accepts_unknown_ids() {
        // A cookie carried across a restart has no entry yet
        let store = SessionStore::new();

        assert!(store.first_view("held_over_cookie", 7).await);
        assert!(!store.first_view("held_over_cookie", 7).await);
    }
}
