//! Server-side sessions carrying flash messages.
//!
//! A session is identified by a random UUID held in a cookie. Its value is a
//! [`FlashState`], kept in a [`SessionStore`]. The [`SessionLayer`] loads the
//! session before the handler runs, exposes it as a [`Session`] handle in the
//! request extensions, and writes it back once the handler has produced a
//! response. A session whose messages have all been consumed is forgotten.
//!
//! # Example
//!
//! ```ignore
//! use todo_lists_web::session::{InMemorySessionStore, Session, SessionConfig, SessionLayer};
//!
//! async fn create_list(session: Session) -> Redirect {
//!     session.set_success("The list has been created.");
//!     Redirect::to("/lists")
//! }
//!
//! let app = Router::new()
//!     .route("/lists", post(create_list))
//!     .layer(SessionLayer::new(
//!         Arc::new(InMemorySessionStore::new()),
//!         SessionConfig::default(),
//!     ));
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::task::{Context, Poll};
use todo_lists_core::FlashState;
use tower::{Layer, Service};
use uuid::Uuid;

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "todo_lists_session";

/// Session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Session storage errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Backend failure.
    #[error("Session store error: {0}")]
    Backend(String),
}

/// Boxed future returned by [`SessionStore`] methods.
pub type SessionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionError>> + Send + 'a>>;

/// Session store.
///
/// This trait abstracts over session storage so the layer can be backed by
/// memory in a single process or by a shared cache.
pub trait SessionStore: Send + Sync {
    /// Load a session's flash state.
    ///
    /// Returns `None` if the session is unknown or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the backend cannot be reached.
    fn load(&self, id: SessionId) -> SessionFuture<'_, Option<FlashState>>;

    /// Create or replace a session's flash state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the backend cannot be reached.
    fn save(&self, id: SessionId, flash: FlashState) -> SessionFuture<'_, ()>;

    /// Forget a session. Removing an unknown session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Backend`] if the backend cannot be reached.
    fn remove(&self, id: SessionId) -> SessionFuture<'_, ()>;
}

/// Default lifetime of an idle session, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u32 = 24 * 60 * 60;

#[derive(Debug)]
struct StoredSession {
    flash: FlashState,
    last_access: DateTime<Utc>,
}

/// Process-local [`SessionStore`].
///
/// - Sliding expiration: every load or save refreshes a session's TTL
/// - Expired sessions are evicted on the next load or save
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, StoredSession>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    /// Create an empty store with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(i64::from(DEFAULT_SESSION_TTL_SECS)))
    }

    /// Create an empty store whose sessions expire after `ttl` without access.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones included until evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no session is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_expired(&self, sessions: &mut HashMap<SessionId, StoredSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, stored| now.signed_duration_since(stored.last_access) < self.ttl);

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Expired sessions evicted");
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: SessionId) -> SessionFuture<'_, Option<FlashState>> {
        Box::pin(async move {
            let now = Utc::now();
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            self.evict_expired(&mut sessions, now);

            Ok(sessions.get_mut(&id).map(|stored| {
                stored.last_access = now;
                stored.flash.clone()
            }))
        })
    }

    fn save(&self, id: SessionId, flash: FlashState) -> SessionFuture<'_, ()> {
        Box::pin(async move {
            let now = Utc::now();
            let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
            self.evict_expired(&mut sessions, now);

            sessions.insert(
                id,
                StoredSession {
                    flash,
                    last_access: now,
                },
            );
            Ok(())
        })
    }

    fn remove(&self, id: SessionId) -> SessionFuture<'_, ()> {
        Box::pin(async move {
            self.sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            Ok(())
        })
    }
}

/// Handle to the current request's session.
///
/// Clones share the same flash state. Extract it in handlers; the layer
/// persists whatever the handler left in it.
#[derive(Debug, Clone)]
pub struct Session {
    flash: Arc<Mutex<FlashState>>,
}

impl Session {
    fn new(flash: FlashState) -> Self {
        Self {
            flash: Arc::new(Mutex::new(flash)),
        }
    }

    fn with_flash<T>(&self, f: impl FnOnce(&mut FlashState) -> T) -> T {
        let mut flash = self.flash.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *flash)
    }

    /// Replace the pending error message.
    pub fn set_error(&self, message: impl Into<String>) {
        self.with_flash(|flash| flash.set_error(message));
    }

    /// Replace the pending success message.
    pub fn set_success(&self, message: impl Into<String>) {
        self.with_flash(|flash| flash.set_success(message));
    }

    /// Remove and return the pending messages for rendering.
    #[must_use]
    pub fn take_flash(&self) -> FlashState {
        self.with_flash(FlashState::take)
    }

    /// Copy of the pending messages, leaving them in place.
    #[must_use]
    pub fn flash(&self) -> FlashState {
        self.with_flash(|flash| flash.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session layer is not installed"))
    }
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie name.
    pub cookie_name: String,
    /// Add the `Secure` attribute (HTTPS only).
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secure: false,
        }
    }
}

impl SessionConfig {
    /// `Set-Cookie` value for a session.
    fn cookie(&self, id: SessionId) -> String {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.cookie_name, id.0);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find the session id in the request's `Cookie` headers.
fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(SessionId)
}

/// Layer that attaches a [`Session`] to every request.
#[derive(Clone)]
pub struct SessionLayer {
    store: Arc<dyn SessionStore>,
    config: Arc<SessionConfig>,
}

impl SessionLayer {
    /// Create a layer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

/// Middleware service for sessions.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    store: Arc<dyn SessionStore>,
    config: Arc<SessionConfig>,
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // The ready service is the one that must handle this request
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let store = Arc::clone(&self.store);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let known = match session_id_from_headers(req.headers(), &config.cookie_name) {
                Some(id) => match store.load(id).await {
                    Ok(flash) => flash.map(|flash| (id, flash)),
                    Err(e) => {
                        return Ok(AppError::internal("An internal error occurred")
                            .with_source(e.into())
                            .into_response());
                    }
                },
                None => None,
            };

            let is_new = known.is_none();
            let (id, flash) = known.unwrap_or_else(|| (SessionId::new(), FlashState::new()));
            let session = Session::new(flash);
            req.extensions_mut().insert(session.clone());

            let mut response = inner.call(req).await?;

            let flash = session.flash();
            // Sessions only exist to carry pending messages
            if flash.is_empty() {
                if !is_new {
                    if let Err(e) = store.remove(id).await {
                        tracing::error!(error = %e, "Failed to remove session");
                    }
                }
                return Ok(response);
            }

            if let Err(e) = store.save(id, flash).await {
                tracing::error!(error = %e, "Failed to save session");
                return Ok(response);
            }

            if is_new {
                tracing::debug!(session_id = %id.0, "Session created");
                metrics::counter!("todo_lists.sessions.created").increment(1);
                if let Ok(cookie) = HeaderValue::from_str(&config.cookie(id)) {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(store: Arc<InMemorySessionStore>) -> Router {
        Router::new()
            .route(
                "/set",
                get(|session: Session| async move {
                    session.set_success("The list has been created.");
                    StatusCode::SEE_OTHER
                }),
            )
            .route(
                "/show",
                get(|session: Session| async move {
                    session.take_flash().success().unwrap_or("none").to_string()
                }),
            )
            .layer(SessionLayer::new(store, SessionConfig::default()))
    }

    fn cookie_of(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Set-Cookie should be present")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_flash_survives_one_request() {
        let store = Arc::new(InMemorySessionStore::new());

        let response = app(store.clone())
            .oneshot(Request::get("/set").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = cookie_of(&response);
        assert!(cookie.starts_with("todo_lists_session="));

        let show = || {
            Request::get("/show")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap()
        };

        let first = app(store.clone()).oneshot(show()).await.unwrap();
        assert!(first.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_text(first).await, "The list has been created.");
        assert!(store.is_empty());

        let second = app(store.clone()).oneshot(show()).await.unwrap();
        assert_eq!(body_text(second).await, "none");
    }

    #[tokio::test]
    async fn test_no_cookie_when_nothing_to_remember() {
        let store = Arc::new(InMemorySessionStore::new());

        let response = app(store.clone())
            .oneshot(Request::get("/show").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_id_gets_fresh_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let stale = format!("todo_lists_session={}", Uuid::new_v4());

        let response = app(store.clone())
            .oneshot(
                Request::get("/set")
                    .header(header::COOKIE, stale.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(cookie_of(&response), stale);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_consumed_sessions_are_removed() {
        let store = Arc::new(InMemorySessionStore::new());

        let mut cookies = Vec::new();
        for _ in 0..10 {
            let response = app(store.clone())
                .oneshot(Request::get("/set").body(Body::empty()).unwrap())
                .await
                .unwrap();
            cookies.push(cookie_of(&response));
        }
        assert_eq!(store.len(), 10);

        for cookie in &cookies {
            app(store.clone())
                .oneshot(
                    Request::get("/show")
                        .header(header::COOKIE, cookie.as_str())
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_abandoned_sessions_expire() {
        let store = Arc::new(InMemorySessionStore::with_ttl(Duration::zero()));

        for _ in 0..100 {
            app(store.clone())
                .oneshot(Request::get("/set").body(Body::empty()).unwrap())
                .await
                .unwrap();
        }

        // Each save evicts everything that expired before it
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_session_is_not_loaded() {
        let store = InMemorySessionStore::with_ttl(Duration::zero());
        let id = SessionId::new();
        let mut flash = FlashState::new();
        flash.set_error("The specified list was not found.");

        store.save(id, flash).await.unwrap();
        assert_eq!(store.len(), 1);

        assert!(store.load(id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_live_session_is_loaded() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new();
        let mut flash = FlashState::new();
        flash.set_success("The todo was added.");

        store.save(id, flash).await.unwrap();
        let loaded = store.load(id).await.unwrap().expect("session should be live");
        assert_eq!(loaded.success(), Some("The todo was added."));

        store.remove(id).await.unwrap();
        assert!(store.load(id).await.unwrap().is_none());
    }

    #[test]
    fn test_session_id_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("theme=dark; todo_lists_session={id}; other=1")
                .parse()
                .unwrap(),
        );

        assert_eq!(
            session_id_from_headers(&headers, DEFAULT_COOKIE_NAME),
            Some(SessionId(id))
        );
        assert_eq!(session_id_from_headers(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let id = SessionId::new();
        let config = SessionConfig {
            cookie_name: "sid".to_string(),
            secure: true,
        };

        assert_eq!(
            config.cookie(id),
            format!("sid={}; Path=/; HttpOnly; SameSite=Lax; Secure", id.0)
        );
    }

    #[test]
    fn test_last_write_wins() {
        let session = Session::new(FlashState::new());
        session.set_error("List name must be unique.");
        session.set_error("The specified list was not found.");

        let flash = session.take_flash();
        assert_eq!(flash.error(), Some("The specified list was not found."));
        assert!(session.flash().is_empty());
    }
}
