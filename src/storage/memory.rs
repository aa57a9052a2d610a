use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::ArtifactStore;
use crate::error::{CompassError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    puts: RwLock<usize>,
}

fn poisoned<T>(_: T) -> CompassError {
    CompassError::Storage("memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls that reached the store.
    pub fn put_count(&self) -> usize {
        self.puts.read().map(|n| *n).unwrap_or_default()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn head(&self, key: &str) -> Result<bool> {
        Ok(self.objects.read().map_err(poisoned)?.contains_key(key))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.objects.write().map_err(poisoned)?.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        *self.puts.write().map_err(poisoned)? += 1;
        log::debug!("Stored {} in memory", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .map_err(poisoned)?
            .get(key)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| CompassError::Storage(format!("no such key: {}", key)))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .read()
            .map_err(poisoned)?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
