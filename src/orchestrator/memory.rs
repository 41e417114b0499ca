use std::sync::Arc;

use crate::config::Config;
use crate::models::{Role, SessionId, Turn};
use crate::storage::session_store::{SessionStore, StoreError};

/// Display names used when rendering a transcript.
#[derive(Debug, Clone)]
pub struct SpeakerLabels {
    pub user: String,
    pub bot: String,
}

impl SpeakerLabels {
    pub fn label(&self, role: Role) -> &str {
        match role {
            Role::User => &self.user,
            Role::Bot => &self.bot,
        }
    }
}

impl Default for SpeakerLabels {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SpeakerLabels {
    fn from(cfg: &Config) -> Self {
        Self {
            user: cfg.user_label.clone(),
            bot: cfg.bot_label.clone(),
        }
    }
}

/// Per-session conversation history on top of a [`SessionStore`].
#[derive(Clone)]
pub struct ConversationMemory {
    store: Arc<dyn SessionStore>,
    labels: SpeakerLabels,
}

impl ConversationMemory {
    pub fn new(store: Arc<dyn SessionStore>, labels: SpeakerLabels) -> Self {
        Self { store, labels }
    }

    /// Appends a timestamped turn and extends the session's expiry.
    pub async fn record_turn(
        &self,
        session_id: &SessionId,
        role: Role,
        message: &str,
    ) -> Result<(), StoreError> {
        self.store
            .append(session_id, &Turn::new(role, message))
            .await
    }

    /// The last `max_messages` turns as `"<label>: <message>"` lines.
    /// An empty history renders as an empty string.
    pub async fn recent_transcript(
        &self,
        session_id: &SessionId,
        max_messages: usize,
    ) -> Result<String, StoreError> {
        let recent = self.store.load_recent(session_id, max_messages).await?;
        let skip = recent.len().saturating_sub(max_messages);

        Ok(recent[skip..]
            .iter()
            .map(|turn| format!("{}: {}", self.labels.label(turn.role), turn.message))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub async fn history(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        self.store.load(session_id).await
    }

    pub async fn clear(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.store.clear(session_id).await
    }
}
