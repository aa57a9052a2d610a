mod common;

use common::*;
use compass::catalog::{list_reports, load_fundamentals};
use compass::edinet::{ArtifactFormat, StatementType};
use compass::process::{FilingProcessor, FilingStats};
use compass::publish::{artifact_key, fundamentals_key};
use compass::storage::{ArtifactStore, MemoryStore};
use compass::{CompassError, Publisher};
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;

fn processor(store: Arc<MemoryStore>, scratch: &std::path::Path) -> FilingProcessor {
    FilingProcessor::new(Publisher::new(store, 1), scratch)
}

#[tokio::test]
async fn test_balance_sheet_only_filing() {
    let scratch = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let filing = filing("S100BS01", &document(&[balance_sheet_block()]));

    let stats = processor(store.clone(), scratch.path())
        .process(&filing)
        .await
        .unwrap();

    // Fundamentals lack sales and operating profit without an income statement.
    assert_eq!(
        stats,
        FilingStats {
            published: 1,
            invalid: 1,
            not_found: 2,
            ..Default::default()
        }
    );

    let json_key = artifact_key(&filing, StatementType::BalanceSheet, ArtifactFormat::Json);
    let summary: Value = serde_json::from_slice(&store.get(&json_key).await.unwrap()).unwrap();
    assert_eq!(summary["unit_string"], "百万円");
    assert_eq!(summary["company_name"], FILER_NAME);
    assert_eq!(summary["current_assets"]["previous"], 10897603);
    assert_eq!(summary["current_assets"]["current"], 11000000);
    assert_eq!(summary["current_liabilities"]["current"], 550);
    assert_eq!(summary["net_assets"]["current"], 750);

    let html_key = artifact_key(&filing, StatementType::BalanceSheet, ArtifactFormat::Html);
    let html = store.object(&html_key).unwrap();
    assert_eq!(html.content_type, "text/html");
    let html = String::from_utf8(html.bytes).unwrap();
    assert!(html.starts_with("<table"));
    assert!(!html.contains("colgroup"));
    assert!(!html.contains("481.5pt"));

    assert!(!store
        .head(&fundamentals_key(FILER_CODE, PERIOD_START, PERIOD_END))
        .await
        .unwrap());
    assert!(!scratch.path().join("S100BS01").exists());
}

#[tokio::test]
async fn test_full_filing_publishes_everything_once() {
    let scratch = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let processor = processor(store.clone(), scratch.path());
    let filing = filing(
        "S100FULL",
        &document(&[
            balance_sheet_block(),
            income_statement_block(),
            cash_flow_block(),
        ]),
    );

    let first = processor.process(&filing).await.unwrap();
    assert_eq!(first.published, 4);
    assert_eq!(first.invalid + first.not_found + first.errors, 0);
    // three JSON summaries, three HTML fragments and the fundamentals record
    assert_eq!(store.len(), 7);
    let writes = store.put_count();

    let second = processor.process(&filing).await.unwrap();
    assert_eq!(second.published, 0);
    assert_eq!(second.skipped_duplicates, 4);
    assert_eq!(store.put_count(), writes);

    let records = load_fundamentals(store.as_ref(), FILER_CODE).await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.sales, 6000);
    assert_eq!(record.operating_profit, 900);
    assert_eq!(record.liabilities, 1200);
    assert_eq!(record.net_assets, 750);
    assert!(!record.has_operating_revenue);

    let cash_flows = list_reports(
        store.as_ref(),
        FILER_CODE,
        StatementType::CashFlow,
        ArtifactFormat::Json,
    )
    .await
    .unwrap();
    assert_eq!(cash_flows.len(), 1);
    let cf: Value = serde_json::from_slice(&cash_flows[0].1).unwrap();
    assert_eq!(cf["investing_cf"]["previous"], -300);
    assert_eq!(cf["financing_cf"]["current"], 200);
}

#[tokio::test]
async fn test_invalid_statement_keeps_html_and_siblings() {
    let scratch = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let incomplete_income = statement_block(
        "jpcrp_cor:StatementOfIncomeTextBlock",
        "千円",
        &[("売上高", "5,000", "6,000")],
    );
    let filing = filing(
        "S100HALF",
        &document(&[balance_sheet_block(), incomplete_income, cash_flow_block()]),
    );

    let stats = processor(store.clone(), scratch.path())
        .process(&filing)
        .await
        .unwrap();
    assert_eq!(stats.published, 2);
    // income statement and fundamentals
    assert_eq!(stats.invalid, 2);

    let pl_html = artifact_key(&filing, StatementType::IncomeStatement, ArtifactFormat::Html);
    let pl_json = artifact_key(&filing, StatementType::IncomeStatement, ArtifactFormat::Json);
    assert!(store.head(&pl_html).await.unwrap());
    assert!(!store.head(&pl_json).await.unwrap());
    assert!(store
        .head(&artifact_key(&filing, StatementType::CashFlow, ArtifactFormat::Json))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_document_without_statements() {
    let scratch = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let filing = filing("S100NONE", &document(&[]));

    let stats = processor(store.clone(), scratch.path())
        .process(&filing)
        .await
        .unwrap();
    assert_eq!(stats.not_found, 3);
    assert_eq!(stats.invalid, 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unsafe_doc_id_leaves_scratch_untouched() {
    let parent = tempdir().unwrap();
    let scratch_root = parent.path().join("scratch");
    std::fs::create_dir_all(scratch_root.join("OTHER")).unwrap();
    std::fs::write(scratch_root.join("OTHER").join("keep.xbrl"), b"in flight").unwrap();
    std::fs::write(parent.path().join("beside.txt"), b"keep").unwrap();

    let store = Arc::new(MemoryStore::new());
    let processor = processor(store.clone(), &scratch_root);
    for doc_id in ["", "..", "a/b"] {
        let result = processor
            .process(&filing(doc_id, &document(&[balance_sheet_block()])))
            .await;
        assert!(
            matches!(result, Err(CompassError::InvalidFiling { .. })),
            "{:?}",
            doc_id
        );
    }

    assert!(scratch_root.join("OTHER").join("keep.xbrl").is_file());
    assert!(parent.path().join("beside.txt").is_file());
    assert!(store.is_empty());
}
