//! Repository contracts for byte-level persistence.

use super::error::Result;

/// Byte-level key/value store used for crash-recovery blobs.
///
/// Every `put` replaces the whole value as one unit: a reader observes either
/// the previous blob or the new one, never a mix.
pub trait BlobRepository: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous value.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Load the value under `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Check if a value exists
    fn exists(&self, key: &str) -> bool;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
