use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;

use super::session_store::{SessionStore, StoreError};
use crate::models::{SessionId, Turn};

/// Redis-backed session history.
///
/// Each session is a Redis list keyed by the raw session id, one JSON-encoded turn per
/// element. Writes run inside `MULTI` so the push and the expiry reset land together.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl_secs: i64,
}

impl RedisSessionStore {
    /// Opens a managed (auto-reconnecting) connection to `redis_url`.
    #[cfg(not(tarpaulin_include))]
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis session store");
        Ok(Self::with_connection(conn, ttl))
    }

    pub fn with_connection(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            ttl_secs: ttl.as_secs().max(1) as i64,
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").exec_async(&mut conn).await?;
        Ok(())
    }

    async fn range(&self, session_id: &SessionId, start: isize) -> Result<Vec<Turn>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = redis::cmd("LRANGE")
            .arg(session_id.as_str())
            .arg(start)
            .arg(-1)
            .query_async(&mut conn)
            .await?;

        raw.iter()
            .map(|entry| serde_json::from_str(entry).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        self.range(session_id, 0).await
    }

    async fn load_recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Turn>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.range(session_id, -(limit as isize)).await
    }

    async fn save(&self, session_id: &SessionId, history: &[Turn]) -> Result<(), StoreError> {
        let key = session_id.as_str();
        let encoded = history
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;

        let mut pipe = redis::pipe();
        pipe.atomic().cmd("DEL").arg(key).ignore();
        if !encoded.is_empty() {
            pipe.cmd("RPUSH").arg(key).arg(&encoded).ignore();
            pipe.cmd("EXPIRE").arg(key).arg(self.ttl_secs).ignore();
        }

        let mut conn = self.conn.clone();
        pipe.exec_async(&mut conn).await?;
        tracing::trace!("Saved {} turns for session {}", encoded.len(), key);
        Ok(())
    }

    async fn append(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError> {
        let key = session_id.as_str();
        let encoded = serde_json::to_string(turn)?;

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .cmd("RPUSH")
            .arg(key)
            .arg(encoded)
            .ignore()
            .cmd("EXPIRE")
            .arg(key)
            .arg(self.ttl_secs)
            .ignore()
            .exec_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(session_id.as_str())
            .exec_async(&mut conn)
            .await?;
        tracing::debug!("Cleared session {}", session_id);
        Ok(())
    }
}
