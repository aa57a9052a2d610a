mod common;

use async_trait::async_trait;
use common::*;
use compass::edinet::FilingListEntry;
use compass::process::{BatchRunner, DirSource, FilingOutcome, FilingProcessor, FilingSource};
use compass::storage::{ArtifactStore, FsStore};
use compass::{CompassConfig, Publisher, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn full_document() -> String {
    document(&[
        balance_sheet_block(),
        income_statement_block(),
        cash_flow_block(),
    ])
}

#[tokio::test]
async fn test_batch_over_directory_source() {
    let input = tempdir().unwrap();
    let artifacts = tempdir().unwrap();
    let scratch = tempdir().unwrap();

    for doc_id in ["S1", "S2", "S3"] {
        std::fs::write(input.path().join(format!("{}.xbrl", doc_id)), full_document()).unwrap();
    }

    let mut config = CompassConfig::new(artifacts.path());
    config.input_dir = input.path().to_path_buf();
    config.max_concurrent_filings = 2;

    let store = Arc::new(FsStore::new(&config.artifact_root));
    let processor = Arc::new(FilingProcessor::new(
        Publisher::new(store.clone(), config.store_retries),
        scratch.path(),
    ));
    let runner = BatchRunner::new(processor, Arc::new(DirSource::new(&config.input_dir)), &config);

    let entries = vec![
        list_entry("S1"),
        list_entry("S2"),
        list_entry("S3"),
        list_entry("S1"),
        list_entry("MISSING"),
    ];
    let report = runner.process_filings(entries).await;

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.completed(), 3);
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.outcome("MISSING"), Some(FilingOutcome::Failed(_))));

    // Every filing shares filer and period, so fundamentals collide on one
    // key. Concurrent filings may both pass the existence check.
    let totals = report.totals();
    assert_eq!(totals.published + totals.skipped_duplicates, 3 * 4);
    assert!(totals.published >= 3 * 3 + 1);
    assert_eq!(totals.invalid + totals.not_found + totals.errors, 0);

    let keys = store.list("E00001/").await.unwrap();
    assert_eq!(keys.len(), 3 * 6 + 1);
    assert!(keys.contains(
        &"E00001/BS/E00001-S2-BS-from-2023-04-01-to-2024-03-31.json".to_string()
    ));
    assert!(keys.contains(
        &"E00001/Fundamentals/E00001-fundamentals-from-2023-04-01-to-2024-03-31.json".to_string()
    ));

    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

struct SlowSource {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl FilingSource for SlowSource {
    async fn fetch(&self, _entry: &FilingListEntry) -> Result<Vec<u8>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(full_document().into_bytes())
    }
}

fn memory_runner(
    source: Arc<SlowSource>,
    config: &CompassConfig,
    scratch: &std::path::Path,
) -> BatchRunner {
    let store = Arc::new(compass::storage::MemoryStore::new());
    let processor = Arc::new(FilingProcessor::new(Publisher::new(store, 1), scratch));
    BatchRunner::new(processor, source, config)
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let scratch = tempdir().unwrap();
    let mut config = CompassConfig::new("unused");
    config.max_concurrent_filings = 2;

    let source = Arc::new(SlowSource {
        delay: Duration::from_millis(50),
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let runner = memory_runner(source.clone(), &config, scratch.path());

    let entries = (0..6).map(|i| list_entry(&format!("S{}", i))).collect();
    let report = runner.process_filings(entries).await;

    assert_eq!(report.completed(), 6);
    assert!(source.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_slow_filing_times_out_without_blocking_others() {
    let scratch = tempdir().unwrap();
    let mut config = CompassConfig::new("unused");
    config.filing_timeout = Duration::from_millis(20);

    let source = Arc::new(SlowSource {
        delay: Duration::from_secs(5),
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let runner = memory_runner(source, &config, scratch.path());

    let report = runner
        .process_filings(vec![list_entry("SLOW1"), list_entry("SLOW2")])
        .await;

    assert_eq!(report.failed(), 2);
    match report.outcome("SLOW1") {
        Some(FilingOutcome::Failed(reason)) => assert!(reason.contains("timed out")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
