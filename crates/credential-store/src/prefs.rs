//! JSON-file preference backend.

use crate::{PreferenceStorage, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File-backed preference storage.
///
/// The full key-value map lives in memory behind a mutex; every mutation
/// rewrites the JSON file, so writes are serialized and last-write-wins.
pub struct FilePrefs {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FilePrefs {
    /// Open (or create) the preference file at `path`.
    ///
    /// A missing file starts empty. A corrupt file is replaced with an
    /// empty store rather than reported: persistence must never wedge
    /// the app over a damaged preferences file.
    pub async fn open(path: PathBuf) -> StorageResult<Self> {
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Preference file is corrupt, resetting to empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened preference store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStorage for FilePrefs {
    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut entries = self.entries.lock().await;
        let existed = entries.remove(key).is_some();
        if existed {
            self.persist(&entries).await?;
        }
        Ok(existed)
    }

    async fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("prefs.json")).await.unwrap();

        assert_eq!(prefs.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let prefs = FilePrefs::open(path.clone()).await.unwrap();
            prefs.set("access_token", "T1").await.unwrap();
            prefs.set("refresh_token", "R1").await.unwrap();
        }

        let reopened = FilePrefs::open(path).await.unwrap();
        assert_eq!(
            reopened.get("access_token").await.unwrap(),
            Some("T1".to_string())
        );
        assert_eq!(
            reopened.get("refresh_token").await.unwrap(),
            Some("R1".to_string())
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_resets_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        tokio::fs::write(&path, "{ not valid json !!").await.unwrap();

        let prefs = FilePrefs::open(path.clone()).await.unwrap();
        assert_eq!(prefs.get("access_token").await.unwrap(), None);

        // The store keeps working after the reset.
        prefs.set("access_token", "T2").await.unwrap();
        assert_eq!(
            prefs.get("access_token").await.unwrap(),
            Some("T2".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_missing_key_does_not_rewrite() {
        let dir = tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("prefs.json")).await.unwrap();

        assert!(!prefs.remove("absent").await.unwrap());
        // No file is created for a no-op removal.
        assert!(!dir.path().join("prefs.json").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_last_write_wins() {
        let dir = tempdir().unwrap();
        let prefs = Arc::new(FilePrefs::open(dir.path().join("prefs.json")).await.unwrap());

        let mut tasks = Vec::new();
        for i in 0..16 {
            let prefs = prefs.clone();
            tasks.push(tokio::spawn(async move {
                prefs.set("slot", &format!("value-{i}")).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // One of the written values won; the store is consistent.
        let value = prefs.get("slot").await.unwrap().unwrap();
        assert!(value.starts_with("value-"));
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let dir = tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("prefs.json")).await.unwrap();

        prefs.set("a", "1").await.unwrap();
        prefs.set("b", "2").await.unwrap();
        prefs.clear().await.unwrap();

        assert_eq!(prefs.get("a").await.unwrap(), None);
        assert_eq!(prefs.get("b").await.unwrap(), None);
    }
}
