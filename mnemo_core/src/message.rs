use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Speaker;

pub type MessageId = Uuid;

/// A transient record of one chat turn. Messages are the *source* of memory
/// extraction but are not themselves memory: they live in the orchestrator's
/// in-memory buffer and the identity collaborator's session history, never
/// in the memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub session_id: String,
    pub role: Speaker,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    #[must_use]
    pub fn new(session_id: impl Into<String>, role: Speaker, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
