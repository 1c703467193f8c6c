//! `KeyValueStore` trait — the injected storage the session store writes to.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic string key-value storage.
///
/// Semantics follow browser local storage: writes are visible to every
/// holder of the same store and the last writer wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every value.
    async fn clear(&self) -> Result<(), StorageError>;
}
