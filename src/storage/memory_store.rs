//! In-process session store with per-key expiry

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::session_store::{SessionStore, StoreError};
use crate::models::{SessionId, Turn};

struct Entry {
    turns: Vec<Turn>,
    expires_at: Instant,
}

/// Session history held in memory: session id -> (turns, expiry deadline)
#[derive(Clone)]
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Drop expired sessions (call periodically)
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(match sessions.get(session_id) {
            Some(entry) if entry.expires_at > Instant::now() => entry.turns.clone(),
            _ => Vec::new(),
        })
    }

    async fn save(&self, session_id: &SessionId, history: &[Turn]) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if history.is_empty() {
            sessions.remove(session_id);
        } else {
            sessions.insert(
                session_id.clone(),
                Entry {
                    turns: history.to_vec(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        Ok(())
    }

    async fn append(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let entry = sessions.entry(session_id.clone()).or_insert_with(|| Entry {
            turns: Vec::new(),
            expires_at: now,
        });

        // An expired entry restarts from an empty history
        if entry.expires_at <= now {
            entry.turns.clear();
        }
        entry.turns.push(turn.clone());
        entry.expires_at = now + self.ttl;
        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
