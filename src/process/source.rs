use async_trait::async_trait;
use std::path::PathBuf;

use crate::edinet::filing::check_doc_id;
use crate::edinet::FilingListEntry;
use crate::error::{CompassError, Result};

pub const DOCUMENT_EXTENSION: &str = "xbrl";

/// Supplies the raw, already-decompressed document bytes for one filing.
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn fetch(&self, entry: &FilingListEntry) -> Result<Vec<u8>>;
}

/// Reads `{dir}/{docId}.xbrl`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn document_path(&self, doc_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", doc_id, DOCUMENT_EXTENSION))
    }
}

#[async_trait]
impl FilingSource for DirSource {
    async fn fetch(&self, entry: &FilingListEntry) -> Result<Vec<u8>> {
        check_doc_id(&entry.doc_id)?;
        let path = self.document_path(&entry.doc_id);
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CompassError::InvalidFiling {
                    doc_id: entry.doc_id.clone(),
                    reason: format!("document not found at {}", path.display()),
                }
            } else {
                e.into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_by_doc_id() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("S1.xbrl"), b"one").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.document_path("S1"), dir.path().join("S1.xbrl"));

        let entry = FilingListEntry {
            doc_id: "S1".to_string(),
            ..Default::default()
        };
        assert_eq!(source.fetch(&entry).await.unwrap(), b"one");

        let missing = FilingListEntry {
            doc_id: "S9".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            source.fetch(&missing).await,
            Err(CompassError::InvalidFiling { .. })
        ));

        let escaping = FilingListEntry {
            doc_id: "../S1".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            source.fetch(&escaping).await,
            Err(CompassError::InvalidFiling { .. })
        ));
    }
}
