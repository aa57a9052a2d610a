use async_trait::async_trait;

use crate::error::Result;

pub mod fs;
pub mod memory;

pub use self::fs::FsStore;
pub use self::memory::MemoryStore;

/// Blob-store port the publisher and catalog are written against.
///
/// Keys are `/`-separated paths such as `E00001/BS/E00001-S100-BS-from-…json`.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Metadata-only existence check
    async fn head(&self, key: &str) -> Result<bool>;

    /// Write `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Read the object stored under `key`
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// All keys starting with `prefix`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
