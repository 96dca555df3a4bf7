use async_trait::async_trait;
use crate::Result;

/// Keyed text storage. Keys are `/`-separated relative paths such as
/// `briefings/2024-01-01.md`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`. Bytes that are not
    /// valid UTF-8 are decoded lossily rather than reported as an error.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the contents under `key`. Readers observe either the old or the
    /// new contents, never a partial write.
    async fn write_atomic(&self, key: &str, contents: &str) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Lists entry names directly under `dir`. A missing `dir` yields an empty list.
    async fn list(&self, dir: &str) -> Result<Vec<String>>;
}
