//! Idempotent artifact publishing over the persistence port.

use serde::Serialize;
use std::sync::Arc;

use crate::edinet::{ArtifactFormat, Filing, StatementType};
use crate::error::Result;
use crate::storage::ArtifactStore;
use crate::utils::retry::retry_with_backoff;

/// `{code}/{ST}/{code}-{docId}-{ST}-from-{start}-to-{end}.{ext}`
pub fn artifact_key(filing: &Filing, statement: StatementType, format: ArtifactFormat) -> String {
    let label = statement.label();
    format!(
        "{code}/{label}/{code}-{doc}-{label}-from-{start}-to-{end}.{ext}",
        code = filing.filer_code,
        label = label,
        doc = filing.doc_id,
        start = filing.period_start,
        end = filing.period_end,
        ext = format.extension(),
    )
}

/// `{code}/Fundamentals/{code}-fundamentals-from-{start}-to-{end}.json`
pub fn fundamentals_key(filer_code: &str, period_start: &str, period_end: &str) -> String {
    format!(
        "{code}/{label}/{code}-fundamentals-from-{start}-to-{end}.{ext}",
        code = filer_code,
        label = StatementType::Fundamentals.label(),
        start = period_start,
        end = period_end,
        ext = ArtifactFormat::Json.extension(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// The key already existed; nothing was written.
    AlreadyExists,
}

/// First-writer-wins publisher: `head` then `put` only when absent.
///
/// Two publishers racing on one key may both write. Content for a key is
/// derived from immutable filing data, so the duplicate write is identical.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ArtifactStore>,
    max_attempts: usize,
}

impl Publisher {
    /// Each store call is tried once plus up to `retries` more times.
    pub fn new(store: Arc<dyn ArtifactStore>, retries: usize) -> Self {
        Self {
            store,
            max_attempts: retries.saturating_add(1),
        }
    }

    pub async fn publish(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<PublishOutcome> {
        let exists = retry_with_backoff(&format!("head {}", key), self.max_attempts, || {
            self.store.head(key)
        })
        .await?;
        if exists {
            log::debug!("{} already exists, skipping write", key);
            return Ok(PublishOutcome::AlreadyExists);
        }

        retry_with_backoff(&format!("put {}", key), self.max_attempts, || {
            self.store.put(key, bytes.clone(), content_type)
        })
        .await?;
        Ok(PublishOutcome::Published)
    }

    /// Pretty-printed (2-space) UTF-8 JSON.
    pub async fn publish_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<PublishOutcome> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.publish(key, bytes, ArtifactFormat::Json.content_type().as_ref())
            .await
    }

    pub async fn publish_html(&self, key: &str, html: &str) -> Result<PublishOutcome> {
        self.publish(
            key,
            html.as_bytes().to_vec(),
            ArtifactFormat::Html.content_type().as_ref(),
        )
        .await
    }
}
