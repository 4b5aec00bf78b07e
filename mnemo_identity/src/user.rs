use std::path::PathBuf;

use chrono::{DateTime, Utc};
use mnemo_core::Result;
use serde::{Deserialize, Serialize};

use crate::fs_store::{read_json_optional, record_path, write_json_atomic};

/// `{data_dir}/users/{user_id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct UserStore {
    root: PathBuf,
}

impl UserStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { root: data_dir.into().join("users") }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserRecord>> {
        read_json_optional(&record_path(&self.root, user_id)).await
    }

    /// Load the user if present; otherwise create one, optionally naming it
    /// via `username`.
    pub async fn get_or_create(&self, user_id: &str, username: Option<&str>) -> Result<UserRecord> {
        if let Some(existing) = self.get(user_id).await? {
            return Ok(existing);
        }

        let record = UserRecord {
            user_id: user_id.to_string(),
            username: username.map(str::to_string),
            created_at: Utc::now(),
        };

        write_json_atomic(&record_path(&self.root, user_id), &record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_user_once_and_reuses_on_subsequent_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());

        let first = store.get_or_create("u1", Some("alice")).await.unwrap();
        let second = store.get_or_create("u1", Some("someone-else")).await.unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
