use honeypot_core::session::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one session. The mutex serializes every operation on
/// that session; distinct sessions never contend.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory registry of live sessions keyed by session ID.
///
/// Sessions are created on first contact and never removed by the engine.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates a new empty SessionRegistry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets a session handle by ID.
    ///
    /// # Returns
    ///
    /// `Some(handle)` if the session exists, `None` otherwise.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Returns the session for `session_id`, creating it with `create` if it
    /// does not exist yet.
    ///
    /// The boolean is true when this call created the session. Concurrent
    /// callers racing on a new ID all receive the same handle.
    pub async fn get_or_create<F>(&self, session_id: &str, create: F) -> (SessionHandle, bool)
    where
        F: FnOnce() -> Session,
    {
        if let Some(existing) = self.get(session_id).await {
            return (existing, false);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(session_id) {
            return (existing.clone(), false);
        }
        let handle = Arc::new(Mutex::new(create()));
        sessions.insert(session_id.to_string(), handle.clone());
        (handle, true)
    }

    /// Number of sessions held.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// IDs of all held sessions, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honeypot_core::session::MessageMetadata;

    #[tokio::test]
    async fn test_get_or_create_creates_once() {
        let registry = SessionRegistry::new();
        let (first, created) = registry
            .get_or_create("s1", || Session::new("s1", MessageMetadata::default()))
            .await;
        assert!(created);

        let (second, created) = registry
            .get_or_create("s1", || panic!("must not create twice"))
            .await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get("missing").await.is_none());
        assert!(registry.is_empty().await);
    }
}
