//! Filing Processor: per-filing pipeline and the bounded fan-out over filings.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::CompassConfig;
use crate::edinet::parsing::{
    build_balance_sheet, build_cash_flow, build_income_statement, clean_fragment, extract_rows,
    locate, FilingIdentity, FundamentalsRecord, StatementSummary, Validate,
};
use crate::edinet::filing::check_doc_id;
use crate::edinet::{ArtifactFormat, Filing, FilingListEntry, StatementType};
use crate::error::{CompassError, Result};
use crate::publish::{artifact_key, fundamentals_key, PublishOutcome, Publisher};
use crate::utils::rate_limit::ConcurrencyLimiter;

pub mod report;
pub mod source;

pub use report::{FilingOutcome, FilingResult, FilingStats, RunReport};
pub use source::{DirSource, FilingSource};

/// How one statement branch of a filing ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOutcome {
    Published,
    SkippedDuplicate,
    Invalid,
    NotFound,
}

impl FilingStats {
    fn record(&mut self, outcome: StatementOutcome) {
        match outcome {
            StatementOutcome::Published => self.published += 1,
            StatementOutcome::SkippedDuplicate => self.skipped_duplicates += 1,
            StatementOutcome::Invalid => self.invalid += 1,
            StatementOutcome::NotFound => self.not_found += 1,
        }
    }
}

impl From<PublishOutcome> for StatementOutcome {
    fn from(outcome: PublishOutcome) -> Self {
        match outcome {
            PublishOutcome::Published => StatementOutcome::Published,
            PublishOutcome::AlreadyExists => StatementOutcome::SkippedDuplicate,
        }
    }
}

/// Per-filing working directory, removed when dropped.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    async fn create(root: &Path, doc_id: &str) -> Result<Self> {
        let path = root.join(doc_id);
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => log::debug!("Removed scratch dir {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Runs locate, extract, classify, validate and publish for one filing.
pub struct FilingProcessor {
    publisher: Publisher,
    scratch_root: PathBuf,
}

impl FilingProcessor {
    pub fn new(publisher: Publisher, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            publisher,
            scratch_root: scratch_root.into(),
        }
    }

    /// Statements run sequentially; the fundamentals record is owned by this
    /// call and filled by the balance-sheet and income-statement passes.
    ///
    /// Only filing-level failures (unsafe doc id, scratch IO) are returned as
    /// errors. A
    /// failing statement branch is logged and counted in `errors`.
    pub async fn process(&self, filing: &Filing) -> Result<FilingStats> {
        check_doc_id(&filing.doc_id)?;
        let scratch = ScratchDir::create(&self.scratch_root, &filing.doc_id).await?;
        let document = scratch
            .write(&format!("{}.{}", filing.doc_id, source::DOCUMENT_EXTENSION), &filing.payload)
            .await?;
        let raw_text = String::from_utf8_lossy(&tokio::fs::read(&document).await?).into_owned();

        let mut stats = FilingStats::default();
        let mut fundamentals = FundamentalsRecord::new(FilingIdentity::from_filing(filing));

        for statement in StatementType::located() {
            match self
                .process_statement(filing, &raw_text, statement, &mut fundamentals)
                .await
            {
                Ok(outcome) => stats.record(outcome),
                Err(e) => {
                    log::error!(
                        "Failed to publish {} for {} ({}): {}",
                        statement.display_name(),
                        filing.filer_name,
                        filing.doc_id,
                        e
                    );
                    stats.errors += 1;
                }
            }
        }

        match self.publish_fundamentals(filing, &fundamentals).await {
            Ok(outcome) => stats.record(outcome),
            Err(e) => {
                log::error!(
                    "Failed to publish fundamentals for {} ({}): {}",
                    filing.filer_name,
                    filing.doc_id,
                    e
                );
                stats.errors += 1;
            }
        }

        drop(scratch);
        Ok(stats)
    }

    async fn process_statement(
        &self,
        filing: &Filing,
        raw_text: &str,
        statement: StatementType,
        fundamentals: &mut FundamentalsRecord,
    ) -> Result<StatementOutcome> {
        let Some(fragment) = locate(raw_text, statement) else {
            log::info!(
                "No {} in {} ({})",
                statement.display_name(),
                filing.filer_name,
                filing.doc_id
            );
            return Ok(StatementOutcome::NotFound);
        };

        let html = clean_fragment(&fragment.text);
        let html_key = artifact_key(filing, statement, ArtifactFormat::Html);
        let html_outcome = self.publisher.publish_html(&html_key, &html).await?;
        log::debug!("{} -> {:?}", html_key, html_outcome);

        let table = extract_rows(&html);
        let identity = FilingIdentity::from_filing(filing);
        let summary = match statement {
            StatementType::BalanceSheet => {
                StatementSummary::BalanceSheet(build_balance_sheet(identity, &table, fundamentals))
            }
            StatementType::IncomeStatement => StatementSummary::IncomeStatement(
                build_income_statement(identity, &table, fundamentals),
            ),
            StatementType::CashFlow => {
                StatementSummary::CashFlow(build_cash_flow(identity, &table))
            }
            StatementType::Fundamentals => return Ok(StatementOutcome::NotFound),
        };

        let json_key = artifact_key(filing, statement, ArtifactFormat::Json);
        if !summary.is_valid() {
            log::warn!(
                "Invalid {} for {}, not publishing {}",
                statement.display_name(),
                summary.identity().company_name,
                json_key
            );
            if log::log_enabled!(log::Level::Debug) {
                if let Ok(pretty) = serde_json::to_string_pretty(&summary) {
                    log::debug!("{}", pretty);
                }
            }
            return Ok(StatementOutcome::Invalid);
        }

        let outcome = self.publisher.publish_json(&json_key, &summary).await?;
        log_published(&json_key, outcome);
        Ok(outcome.into())
    }

    async fn publish_fundamentals(
        &self,
        filing: &Filing,
        fundamentals: &FundamentalsRecord,
    ) -> Result<StatementOutcome> {
        let key = fundamentals_key(&filing.filer_code, &filing.period_start, &filing.period_end);
        if !fundamentals.is_valid() {
            log::warn!(
                "Invalid fundamentals for {}, not publishing {}",
                fundamentals.identity.company_name,
                key
            );
            if log::log_enabled!(log::Level::Debug) {
                if let Ok(pretty) = serde_json::to_string_pretty(fundamentals) {
                    log::debug!("{}", pretty);
                }
            }
            return Ok(StatementOutcome::Invalid);
        }

        let outcome = self.publisher.publish_json(&key, fundamentals).await?;
        log_published(&key, outcome);
        Ok(outcome.into())
    }
}

fn log_published(key: &str, outcome: PublishOutcome) {
    match outcome {
        PublishOutcome::Published => log::info!("Published {}", key),
        PublishOutcome::AlreadyExists => log::info!("{} already published, skipped", key),
    }
}

/// Fans filings out over a bounded set of tasks and collects every outcome.
pub struct BatchRunner {
    processor: Arc<FilingProcessor>,
    source: Arc<dyn FilingSource>,
    limiter: ConcurrencyLimiter,
    filing_timeout: Duration,
}

impl BatchRunner {
    pub fn new(
        processor: Arc<FilingProcessor>,
        source: Arc<dyn FilingSource>,
        config: &CompassConfig,
    ) -> Self {
        Self {
            processor,
            source,
            limiter: ConcurrencyLimiter::new(config.max_concurrent_filings),
            filing_timeout: config.filing_timeout,
        }
    }

    /// Processes every entry; one filing's failure never aborts the others.
    ///
    /// Entries repeating an earlier doc id are dropped, since they would share
    /// a scratch directory.
    pub async fn process_filings(&self, entries: Vec<FilingListEntry>) -> RunReport {
        let mut seen = HashSet::new();
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                let fresh = seen.insert(entry.doc_id.clone());
                if !fresh {
                    log::warn!("Skipping repeated filing {}", entry.doc_id);
                }
                fresh
            })
            .collect();

        log::info!(
            "Processing {} filings, at most {} at a time",
            entries.len(),
            self.limiter.max_concurrent()
        );

        let results = stream::iter(entries)
            .map(|entry| self.run_one(entry))
            .buffer_unordered(self.limiter.max_concurrent())
            .collect::<Vec<_>>()
            .await;

        let report = RunReport { results };
        log::info!("{}", report);
        report
    }

    async fn run_one(&self, entry: FilingListEntry) -> FilingResult {
        let doc_id = entry.doc_id.clone();
        let outcome = match self.spawn_filing(entry).await {
            Ok(stats) => {
                log::info!("Finished {}: {}", doc_id, stats);
                FilingOutcome::Completed(stats)
            }
            Err(e) => {
                log::error!("Filing {} failed: {}", doc_id, e);
                FilingOutcome::Failed(e.to_string())
            }
        };
        FilingResult { doc_id, outcome }
    }

    async fn spawn_filing(&self, entry: FilingListEntry) -> Result<FilingStats> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| CompassError::Storage(format!("concurrency limiter closed: {}", e)))?;

        let processor = Arc::clone(&self.processor);
        let source = Arc::clone(&self.source);
        let timeout = self.filing_timeout;
        let doc_id = entry.doc_id.clone();

        let task = tokio::spawn(async move {
            let work = async {
                let payload = source.fetch(&entry).await?;
                let filing = entry.into_filing(payload)?;
                processor.process(&filing).await
            };
            match tokio::time::timeout(timeout, work).await {
                Ok(result) => result,
                Err(_) => Err(CompassError::Timeout {
                    doc_id,
                    secs: timeout.as_secs(),
                }),
            }
        });
        task.await?
    }
}
