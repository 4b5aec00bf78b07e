use chrono::{DateTime, Utc};

use crate::buffer::MessageBuffer;

/// Per-session state held only for the lifetime of a live conversation
///. Durable history lives in
/// `mnemo_identity::SessionStore`; this is the orchestrator's own bounded
/// working set plus the counter driving extraction-job coalescing.
pub struct SessionState {
    pub buffer: MessageBuffer,
    pub turns_since_extraction: u32,
    pub last_active: DateTime<Utc>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: MessageBuffer::new(),
            turns_since_extraction: 0,
            last_active: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    #[must_use]
    pub fn idle_for(&self) -> chrono::Duration {
        Utc::now() - self.last_active
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
