use std::path::PathBuf;

use chrono::{DateTime, Utc};
use mnemo_core::{Message, Result};
use serde::{Deserialize, Serialize};

use crate::fs_store::{read_json_optional, record_path, write_json_atomic};

/// `{data_dir}/sessions/{session_id}.json`: metadata plus the
/// durable message history (distinct from the orchestrator's bounded
/// in-memory buffer, which is a soft-capped working set, not the record of
/// truth).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub role_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { root: data_dir.into().join("sessions") }
    }

    pub async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        read_json_optional(&record_path(&self.root, session_id)).await
    }

    pub async fn get_or_create(&self, session_id: &str, user_id: &str, role_id: &str) -> Result<SessionRecord> {
        if let Some(existing) = self.get(session_id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let record = SessionRecord {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        };

        write_json_atomic(&record_path(&self.root, session_id), &record).await?;
        Ok(record)
    }

    /// Append `message` to the session's durable history, rewriting the
    /// whole record as a read-modify-write: the unit of storage is the
    /// whole-file JSON document rather than a row.
    pub async fn append_message(&self, session_id: &str, user_id: &str, role_id: &str, message: Message) -> Result<()> {
        let mut record = self.get_or_create(session_id, user_id, role_id).await?;
        record.messages.push(message);
        record.updated_at = Utc::now();
        write_json_atomic(&record_path(&self.root, session_id), &record).await
    }

    /// All sessions belonging to `user_id`, newest-first. There is no secondary index over the
    /// flat-file layout, so this scans every record under `sessions/` —
    /// acceptable for the on-disk collaborator's expected scale.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<SessionRecord>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(mnemo_core::Error::StoreUnavailable(e.to_string())),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| mnemo_core::Error::StoreUnavailable(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(std::ffi::OsStr::to_str) != Some("json") {
                continue;
            }
            if let Some(record) = read_json_optional::<SessionRecord>(&path).await? {
                if record.user_id == user_id {
                    sessions.push(record);
                }
            }
        }

        sessions.sort_unstable_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::Speaker;

    #[tokio::test]
    async fn append_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store
            .append_message("s1", "u1", "default", Message::new("s1", Speaker::User, "hello"))
            .await
            .unwrap();

        let reloaded = store.get("s1").await.unwrap().unwrap();
        assert_eq!(reloaded.messages.len(), 1);
        assert_eq!(reloaded.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let first = store.get_or_create("s1", "u1", "default").await.unwrap();
        store
            .append_message("s1", "u1", "default", Message::new("s1", Speaker::User, "hi"))
            .await
            .unwrap();
        let second = store.get_or_create("s1", "u1", "default").await.unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.messages.len(), 1);
    }

    #[tokio::test]
    async fn list_for_user_returns_only_that_users_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.get_or_create("s1", "u1", "default").await.unwrap();
        store.get_or_create("s2", "u1", "default").await.unwrap();
        store.get_or_create("s3", "u2", "default").await.unwrap();

        let sessions = store.list_for_user("u1").await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.user_id == "u1"));
    }

    #[tokio::test]
    async fn list_for_user_is_empty_when_no_sessions_directory_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.list_for_user("u1").await.unwrap().is_empty());
    }
}
