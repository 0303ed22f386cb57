//! File-backed session storage.
//!
//! All keys live in a single JSON object on disk. Every write replaces the
//! file through a temporary sibling and a rename, so a crash never leaves a
//! half-written file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use olab_core::result::AppResult;

use super::SessionStorage;

/// Session storage persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FileSessionStorage {
    /// Open the store at `path`, loading existing values.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is
    /// logged and treated as empty; it is overwritten on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt session file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = values.len(), "Session storage opened");
        Ok(Self {
            path,
            values: Arc::new(Mutex::new(values)),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(values)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value.to_string());
        self.write(&values).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut values = self.values.lock().await;
        if values.remove(key).is_some() {
            self.write(&values).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> AppResult<()> {
        let values = self.values.lock().await;
        self.write(&values).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileSessionStorage::open(&path).await.unwrap();
        assert_eq!(storage.get("user").await.unwrap(), None);
        storage.set("user", "{\"a\":1}").await.unwrap();

        let reopened = FileSessionStorage::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("user").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        reopened.remove("user").await.unwrap();
        let again = FileSessionStorage::open(&path).await.unwrap();
        assert_eq!(again.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let storage = FileSessionStorage::open(&path).await.unwrap();
        assert_eq!(storage.get("user").await.unwrap(), None);

        storage.set("user", "x").await.unwrap();
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\"user\""));
    }
}
