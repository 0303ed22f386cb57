//! Key-value storage for the persisted session.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use olab_core::result::AppResult;

pub use file::FileSessionStorage;
pub use memory::MemorySessionStorage;

/// A string key-value store that survives restarts.
#[async_trait]
pub trait SessionStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Persist any buffered writes.
    async fn flush(&self) -> AppResult<()> {
        Ok(())
    }
}
