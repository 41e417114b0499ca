use async_trait::async_trait;
use thiserror::Error;

use crate::models::{SessionId, Turn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Expiring per-session conversation history.
///
/// Absent and expired sessions are indistinguishable: both load as an empty history.
/// Every write resets the session's expiry to the store's TTL.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Full history in append order.
    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError>;

    /// The last `limit` turns, oldest first.
    async fn load_recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Turn>, StoreError> {
        let mut history = self.load(session_id).await?;
        let skip = history.len().saturating_sub(limit);
        Ok(history.split_off(skip))
    }

    /// Replaces the stored history wholesale.
    async fn save(&self, session_id: &SessionId, history: &[Turn]) -> Result<(), StoreError>;

    /// Appends one turn atomically with respect to other writers of the same session.
    async fn append(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError>;

    /// Deletes the session. Clearing a missing session is not an error.
    async fn clear(&self, session_id: &SessionId) -> Result<(), StoreError>;
}
