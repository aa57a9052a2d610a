use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::ArtifactStore;
use crate::error::{CompassError, Result};
use crate::utils::paths::is_contained_path;

/// Store backed by a local directory; keys map to relative paths under `root`.
///
/// Content types are not persisted, the extension carries the format.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_contained_path(key) {
            return Err(CompassError::Storage(format!("invalid key: {:?}", key)));
        }
        Ok(self.root.join(key))
    }
}

fn collect_keys(root: &Path, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_keys(root, &path, keys)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
    }
    Ok(())
}

#[async_trait]
impl ArtifactStore for FsStore {
    async fn head(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path_for(key)?).await?)
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Wrote {} ({}) to {}", key, content_type, path.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CompassError::Storage(format!("no such key: {}", key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let root = self.root.clone();
        let mut keys = tokio::task::spawn_blocking(move || {
            let mut keys = Vec::new();
            if root.is_dir() {
                collect_keys(&root, &root, &mut keys)?;
            }
            Ok::<_, std::io::Error>(keys)
        })
        .await??;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}
