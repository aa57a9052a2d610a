//! Read side: lists and loads published artifacts.

use crate::edinet::parsing::FundamentalsRecord;
use crate::edinet::{ArtifactFormat, StatementType};
use crate::error::{CompassError, Result};
use crate::storage::ArtifactStore;

/// `(key, body)` of every `statement` artifact in `format` under `filer_code`.
pub async fn list_reports(
    store: &dyn ArtifactStore,
    filer_code: &str,
    statement: StatementType,
    format: ArtifactFormat,
) -> Result<Vec<(String, Vec<u8>)>> {
    let prefix = format!("{}/", filer_code);
    let suffix = format!(".{}", format.extension());

    let mut reports = Vec::new();
    for key in store.list(&prefix).await? {
        let segment = key.split('/').nth(1);
        if segment != Some(statement.label()) || !key.ends_with(&suffix) {
            continue;
        }
        let body = store.get(&key).await?;
        reports.push((key, body));
    }
    Ok(reports)
}

pub async fn load_fundamentals(
    store: &dyn ArtifactStore,
    filer_code: &str,
) -> Result<Vec<FundamentalsRecord>> {
    let reports = list_reports(
        store,
        filer_code,
        StatementType::Fundamentals,
        ArtifactFormat::Json,
    )
    .await?;

    reports
        .iter()
        .map(|(_, body)| serde_json::from_slice(body).map_err(CompassError::from))
        .collect()
}
