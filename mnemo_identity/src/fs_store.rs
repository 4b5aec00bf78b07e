use std::path::{Path, PathBuf};

use mnemo_core::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Write `value` to `path` as pretty JSON, atomically: serialize to a
/// sibling `.tmp` file first, then rename over the destination so a reader
/// never observes a partially-written file.
pub async fn write_json_atomic<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
    }

    let body = serde_json::to_vec_pretty(value).map_err(|e| Error::StoreUnavailable(e.to_string()))?;
    let tmp_path = path.with_extension(format!("json.{}.tmp", Uuid::now_v7()));

    tokio::fs::write(&tmp_path, &body)
        .await
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

    Ok(())
}

/// Read and deserialize `path` as JSON, returning `Ok(None)` if the file
/// does not exist.
pub async fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|e| Error::StoreUnavailable(e.to_string()))?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::StoreUnavailable(e.to_string())),
    }
}

#[must_use]
pub fn record_path(root: &Path, id: &str) -> PathBuf {
    root.join(format!("{id}.json"))
}
