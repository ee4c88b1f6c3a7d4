//! Typed credential accessors over a storage backend.

use crate::{PreferenceStorage, StorageKeys};
use tracing::warn;

/// Typed facade over a preference backend for the three credential slots.
///
/// Storage failures never surface to callers: a failed read counts as an
/// absent value and a failed write is logged and dropped. Callers treat
/// the store the way the app treats preferences — best effort, never fatal.
pub struct CredentialStore {
    storage: Box<dyn PreferenceStorage>,
}

impl CredentialStore {
    /// Create a new credential store over the given backend.
    pub fn new(storage: Box<dyn PreferenceStorage>) -> Self {
        Self { storage }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Credential read failed, treating as absent");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value).await {
            warn!(key, error = %e, "Credential write failed");
        }
    }

    async fn delete(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            warn!(key, error = %e, "Credential removal failed");
        }
    }

    /// Get the current access token.
    pub async fn access_token(&self) -> Option<String> {
        self.read(StorageKeys::ACCESS_TOKEN).await
    }

    /// Persist a new access token.
    pub async fn save_access_token(&self, token: &str) {
        self.write(StorageKeys::ACCESS_TOKEN, token).await;
    }

    /// Remove the stored access token.
    pub async fn clear_access_token(&self) {
        self.delete(StorageKeys::ACCESS_TOKEN).await;
    }

    /// Get the current refresh token.
    pub async fn refresh_token(&self) -> Option<String> {
        self.read(StorageKeys::REFRESH_TOKEN).await
    }

    /// Persist a new refresh token.
    pub async fn save_refresh_token(&self, token: &str) {
        self.write(StorageKeys::REFRESH_TOKEN, token).await;
    }

    /// Remove the stored refresh token.
    pub async fn clear_refresh_token(&self) {
        self.delete(StorageKeys::REFRESH_TOKEN).await;
    }

    /// Get the signed-in user id.
    pub async fn user_id(&self) -> Option<String> {
        self.read(StorageKeys::USER_ID).await
    }

    /// Persist the signed-in user id.
    pub async fn save_user_id(&self, user_id: &str) {
        self.write(StorageKeys::USER_ID, user_id).await;
    }

    /// Remove the stored user id.
    pub async fn clear_user_id(&self) {
        self.delete(StorageKeys::USER_ID).await;
    }

    /// Clear all three credential slots. The canonical "log out locally".
    pub async fn clear_all(&self) {
        self.clear_access_token().await;
        self.clear_refresh_token().await;
        self.clear_user_id().await;
    }
}
