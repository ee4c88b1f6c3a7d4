//! Storage trait definitions.

use crate::StorageResult;
use async_trait::async_trait;

/// Trait for preference storage backends.
///
/// Backends must serialize concurrent writes to the same key
/// (last write wins) and tolerate concurrent reads.
#[async_trait]
pub trait PreferenceStorage: Send + Sync {
    /// Store a value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value; a missing key yields `None`
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value, returning whether it existed
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Delete every stored value
    async fn clear(&self) -> StorageResult<()>;
}
