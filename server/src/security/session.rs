use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::utils::{calculate_expiry, generate_uuid_token, get_timestamp, is_expired};

/// Process-wide session table with rolling expiry.
///
/// Cheap to clone; every clone shares the same table.
#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
    /// Rolling window in seconds
    window_secs: u64,
}

#[derive(Debug, Clone)]
struct Session {
    logged_in: bool,
    expires_at: u64,
}

/// What a request holds onto after `resume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: String,
    /// Expiry at the moment this handle was produced.
    pub expires_at: u64,
    /// True when `resume` had to allocate a new session.
    pub created: bool,
}

impl SessionStore {
    pub fn new(window_secs: u64) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                window_secs,
            }),
        }
    }

    pub fn window_secs(&self) -> u64 {
        self.inner.window_secs
    }

    /// Resume the session named by `id`, or start a new one.
    pub async fn resume(&self, id: Option<&str>) -> SessionHandle {
        self.resume_at(id, get_timestamp()).await
    }

    /// Unknown and expired ids both get a fresh session. A live session keeps
    /// its id and login flag and has its expiry pushed to `now + window`.
    pub async fn resume_at(&self, id: Option<&str>, now: u64) -> SessionHandle {
        let expires_at = calculate_expiry(now, self.inner.window_secs);
        let mut sessions = self.inner.sessions.write().await;

        if let Some(id) = id {
            match sessions.get_mut(id) {
                Some(session) if !is_expired(session.expires_at, now) => {
                    // Concurrent refreshes on one id keep the later expiry.
                    session.expires_at = session.expires_at.max(expires_at);
                    debug!("Session resumed, expires_at={}", session.expires_at);
                    return SessionHandle {
                        id: id.to_string(),
                        expires_at: session.expires_at,
                        created: false,
                    };
                }
                Some(_) => {
                    debug!("Session expired, evicting");
                    sessions.remove(id);
                }
                None => debug!("Unknown session id presented"),
            }
        }

        let id = generate_uuid_token();
        sessions.insert(
            id.clone(),
            Session {
                logged_in: false,
                expires_at,
            },
        );
        debug!("Session created, expires_at={}", expires_at);

        SessionHandle {
            id,
            expires_at,
            created: true,
        }
    }

    /// Mark the session as logged in (or out). A no-op if it has since been evicted.
    pub async fn set_login_flag(&self, handle: &SessionHandle, value: bool) {
        let mut sessions = self.inner.sessions.write().await;
        if let Some(session) = sessions.get_mut(&handle.id) {
            session.logged_in = value;
        }
    }

    pub async fn is_logged_in(&self, handle: &SessionHandle) -> bool {
        let sessions = self.inner.sessions.read().await;
        sessions
            .get(&handle.id)
            .map(|session| session.logged_in)
            .unwrap_or(false)
    }

    /// Stored expiry for `id`, if the session is still in the table.
    pub async fn expires_at(&self, id: &str) -> Option<u64> {
        let sessions = self.inner.sessions.read().await;
        sessions.get(id).map(|session| session.expires_at)
    }

    /// Remove sessions whose expiry has passed. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(get_timestamp()).await
    }

    pub async fn purge_expired_at(&self, now: u64) -> usize {
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !is_expired(session.expires_at, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.sessions.read().await.is_empty()
    }

    /// Periodically purge expired sessions until the returned task is aborted.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    info!("Purged {} expired sessions", purged);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: u64 = 1200;

    #[tokio::test]
    async fn test_new_session_starts_logged_out() {
        let store = SessionStore::new(WINDOW);
        let handle = store.resume_at(None, 100).await;

        assert!(handle.created);
        assert_eq!(handle.expires_at, 100 + WINDOW);
        assert!(!store.is_logged_in(&handle).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_resume_before_expiry_keeps_id_and_flag() {
        let store = SessionStore::new(WINDOW);
        let first = store.resume_at(None, 100).await;
        store.set_login_flag(&first, true).await;

        let again = store.resume_at(Some(&first.id), 100 + WINDOW - 1).await;
        assert!(!again.created);
        assert_eq!(again.id, first.id);
        assert_eq!(again.expires_at, 100 + WINDOW - 1 + WINDOW);
        assert!(store.is_logged_in(&again).await);
    }

    #[tokio::test]
    async fn test_resume_after_expiry_starts_over() {
        let store = SessionStore::new(WINDOW);
        let first = store.resume_at(None, 100).await;
        store.set_login_flag(&first, true).await;

        let later = store.resume_at(Some(&first.id), 100 + WINDOW).await;
        assert!(later.created);
        assert_ne!(later.id, first.id);
        assert!(!store.is_logged_in(&later).await);
        assert_eq!(store.expires_at(&first.id).await, None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(WINDOW);
        let handle = store.resume_at(Some("not-a-session"), 100).await;
        assert!(handle.created);
        assert_ne!(handle.id, "not-a-session");
    }

    #[tokio::test]
    async fn test_rolling_refresh_keeps_the_later_expiry() {
        let store = SessionStore::new(WINDOW);
        let handle = store.resume_at(None, 100).await;

        let (a, b) = tokio::join!(
            store.resume_at(Some(&handle.id), 200),
            store.resume_at(Some(&handle.id), 150),
        );
        assert_eq!(a.id, handle.id);
        assert_eq!(b.id, handle.id);
        assert_eq!(store.expires_at(&handle.id).await, Some(200 + WINDOW));
    }

    #[tokio::test]
    async fn test_purge_drops_only_expired() {
        let store = SessionStore::new(WINDOW);
        let old = store.resume_at(None, 0).await;
        let fresh = store.resume_at(None, 1000).await;

        assert_eq!(store.purge_expired_at(WINDOW + 1).await, 1);
        assert_eq!(store.expires_at(&old.id).await, None);
        assert!(store.expires_at(&fresh.id).await.is_some());
    }

    proptest::proptest! {
        #[test]
        fn test_live_session_expiry_is_the_latest_refresh(
            offsets in proptest::collection::vec(0u64..WINDOW, 1..24)
        ) {
            tokio_test::block_on(async {
                let store = SessionStore::new(WINDOW);
                let start = 10_000;
                let handle = store.resume_at(None, start).await;

                for offset in &offsets {
                    let again = store.resume_at(Some(&handle.id), start + offset).await;
                    assert!(!again.created);
                }

                let latest = offsets.iter().max().copied().unwrap_or(0);
                assert_eq!(
                    store.expires_at(&handle.id).await,
                    Some(start + latest + WINDOW)
                );
            });
        }
    }

    #[tokio::test]
    async fn test_login_flag_on_evicted_session_is_ignored() {
        let store = SessionStore::new(WINDOW);
        let handle = store.resume_at(None, 0).await;
        store.purge_expired_at(WINDOW).await;

        store.set_login_flag(&handle, true).await;
        assert!(!store.is_logged_in(&handle).await);
        assert!(store.is_empty().await);
    }
}
