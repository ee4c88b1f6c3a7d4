//! Durable credential persistence for the NeuroScan client.
//!
//! This crate stores the session token pair and user id as simple key-value
//! slots. The default backend is a JSON preferences file under the client's
//! base directory; a corrupt file resets to an empty state instead of
//! failing, so a damaged store can never wedge the app.

mod keys;
mod prefs;
mod store;
mod traits;

pub use keys::StorageKeys;
pub use prefs::FilePrefs;
pub use store::CredentialStore;
pub use traits::PreferenceStorage;

use thiserror::Error;

/// Error type for storage backend operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory backend for testing.
    struct MemoryPrefs {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryPrefs {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl PreferenceStorage for MemoryPrefs {
        async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn remove(&self, key: &str) -> StorageResult<bool> {
            Ok(self.entries.lock().await.remove(key).is_some())
        }

        async fn clear(&self) -> StorageResult<()> {
            self.entries.lock().await.clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_memory_prefs() {
        let prefs = MemoryPrefs::new();

        prefs.set("test_key", "test_value").await.unwrap();
        assert_eq!(
            prefs.get("test_key").await.unwrap(),
            Some("test_value".to_string())
        );

        assert!(prefs.remove("test_key").await.unwrap());
        assert!(!prefs.remove("test_key").await.unwrap());
        assert_eq!(prefs.get("test_key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_credential_store_roundtrip() {
        let store = CredentialStore::new(Box::new(MemoryPrefs::new()));

        store.save_access_token("access-123").await;
        store.save_refresh_token("refresh-456").await;
        store.save_user_id("user-789").await;

        assert_eq!(store.access_token().await, Some("access-123".to_string()));
        assert_eq!(store.refresh_token().await, Some("refresh-456".to_string()));
        assert_eq!(store.user_id().await, Some("user-789".to_string()));
    }

    #[tokio::test]
    async fn test_credential_store_clear_all_idempotent() {
        let store = CredentialStore::new(Box::new(MemoryPrefs::new()));

        store.save_access_token("a").await;
        store.save_refresh_token("r").await;
        store.save_user_id("u").await;

        store.clear_all().await;
        store.clear_all().await;

        assert_eq!(store.access_token().await, None);
        assert_eq!(store.refresh_token().await, None);
        assert_eq!(store.user_id().await, None);
    }

    #[tokio::test]
    async fn test_credential_store_missing_keys_are_absent() {
        let store = CredentialStore::new(Box::new(MemoryPrefs::new()));

        assert_eq!(store.access_token().await, None);
        assert_eq!(store.refresh_token().await, None);
        assert_eq!(store.user_id().await, None);
    }

    #[test]
    fn test_storage_keys_unique() {
        let keys = [
            StorageKeys::ACCESS_TOKEN,
            StorageKeys::REFRESH_TOKEN,
            StorageKeys::USER_ID,
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "Storage keys must be unique");
    }
}
