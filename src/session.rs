//! In-memory browser sessions keyed by a cookie
//!
//! Each session owns one reading list. Sessions are stored lazily: a request
//! without a live session sees an empty reading list, and nothing is kept
//! until a handler calls [`SessionStore::persist`]. A stored session that has
//! not been seen for longer than the idle timeout is treated as gone.

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::reading_list::ReadingList;

/// Handle to one session, placed in request extensions by [`session_middleware`]
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub reading_list: Arc<Mutex<ReadingList>>,
    is_new: bool,
}

impl Session {
    /// True when this request had no live session and nothing has been stored yet
    pub fn is_new(&self) -> bool {
        self.is_new
    }
}

#[derive(Debug)]
struct SessionEntry {
    reading_list: Arc<Mutex<ReadingList>>,
    /// Milliseconds since the store's epoch
    last_seen: AtomicU64,
}

/// All live sessions
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    cookie_name: String,
    idle_timeout: Duration,
    epoch: Instant,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            cookie_name: config.cookie_name.clone(),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            epoch: Instant::now(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn millis(&self, now: Instant) -> u64 {
        u64::try_from(now.saturating_duration_since(self.epoch).as_millis()).unwrap_or(u64::MAX)
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        let idle = self
            .millis(now)
            .saturating_sub(entry.last_seen.load(Ordering::Relaxed));
        Duration::from_millis(idle) > self.idle_timeout
    }

    /// Look up a live session by id and mark it as seen.
    ///
    /// Unknown or expired ids yield a fresh, unstored session with an empty list.
    pub async fn resolve(&self, id: Option<Uuid>, now: Instant) -> Session {
        if let Some(id) = id {
            let expired = {
                let sessions = self.sessions.read().await;
                match sessions.get(&id) {
                    Some(entry) if !self.is_expired(entry, now) => {
                        entry.last_seen.store(self.millis(now), Ordering::Relaxed);
                        return Session {
                            id,
                            reading_list: entry.reading_list.clone(),
                            is_new: false,
                        };
                    }
                    Some(_) => true,
                    None => false,
                }
            };

            if expired {
                let mut sessions = self.sessions.write().await;
                // Another request may have touched it in between
                if sessions.get(&id).is_some_and(|e| self.is_expired(e, now)) {
                    sessions.remove(&id);
                    debug!(%id, "Session expired");
                }
            }
        }

        Session {
            id: Uuid::new_v4(),
            reading_list: Arc::new(Mutex::new(ReadingList::new())),
            is_new: true,
        }
    }

    /// Store `session` if it is not stored yet
    pub async fn persist(&self, session: &Session, now: Instant) {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id) {
            sessions.insert(
                session.id,
                SessionEntry {
                    reading_list: session.reading_list.clone(),
                    last_seen: AtomicU64::new(self.millis(now)),
                },
            );
            debug!(id = %session.id, "Started session");
        }
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// Drop every session idle for longer than the timeout, returning how many were dropped
    pub async fn purge_expired(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// `Set-Cookie` value for a session id
    pub fn set_cookie_value(&self, id: Uuid) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            id,
            self.idle_timeout.as_secs()
        )
    }
}

/// Extract the session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Attach a [`Session`] to every request.
///
/// Whenever the session is stored after the handler ran, the cookie is
/// (re)issued so its `Max-Age` follows the idle timeout.
pub async fn session_middleware(
    State(store): State<Arc<SessionStore>>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_id = session_id_from_headers(req.headers(), store.cookie_name());
    let session = store.resolve(cookie_id, Instant::now()).await;
    let id = session.id;
    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;

    if store.contains(id).await {
        match HeaderValue::from_str(&store.set_cookie_value(id)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Could not build session cookie: {}", e),
        }
    }

    response
}

/// Periodically purge expired sessions until the runtime shuts down
pub fn spawn_purge_task(store: Arc<SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = store.purge_expired(Instant::now()).await;
            if purged > 0 {
                let remaining = store.len().await;
                debug!(purged, remaining, "Purged expired sessions");
            }
        }
    })
}
