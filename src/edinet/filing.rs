use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CompassError, Result};
use crate::utils::paths::is_single_component;

/// Annual securities report.
pub const SECURITIES_REPORT: (&str, &str) = ("030000", "120");
/// Amended annual securities report.
pub const AMENDED_SECURITIES_REPORT: (&str, &str) = ("030001", "130");

static DESCRIPTION_PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}/\d{2}/\d{2})－(\d{4}/\d{2}/\d{2})").unwrap());

/// One record of the document-list API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingListEntry {
    #[serde(rename = "docID")]
    pub doc_id: String,
    #[serde(rename = "edinetCode", default)]
    pub edinet_code: Option<String>,
    #[serde(rename = "filerName", default)]
    pub filer_name: Option<String>,
    #[serde(rename = "docDescription", default)]
    pub doc_description: Option<String>,
    #[serde(rename = "periodStart", default)]
    pub period_start: Option<String>,
    #[serde(rename = "periodEnd", default)]
    pub period_end: Option<String>,
    #[serde(rename = "formCode", default)]
    pub form_code: Option<String>,
    #[serde(rename = "docTypeCode", default)]
    pub doc_type_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilingList {
    #[serde(default)]
    pub results: Vec<FilingListEntry>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn slash_date_to_iso(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y/%m/%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Extracts `(start, end)` from a description such as
/// `有価証券報告書－第75期(2023/04/01－2024/03/31)`.
pub fn period_from_description(description: &str) -> Option<(String, String)> {
    let caps = DESCRIPTION_PERIOD_RE.captures(description)?;
    let start = slash_date_to_iso(caps.get(1)?.as_str())?;
    let end = slash_date_to_iso(caps.get(2)?.as_str())?;
    Some((start, end))
}

/// Doc ids name scratch directories and source files, so they must be a
/// single plain path component.
pub fn check_doc_id(doc_id: &str) -> Result<()> {
    if is_single_component(doc_id) {
        Ok(())
    } else {
        Err(CompassError::InvalidFiling {
            doc_id: doc_id.to_string(),
            reason: "doc id is not a plain file name".to_string(),
        })
    }
}

impl FilingListEntry {
    pub fn is_securities_report(&self) -> bool {
        let codes = (
            self.form_code.as_deref().unwrap_or_default(),
            self.doc_type_code.as_deref().unwrap_or_default(),
        );
        codes == SECURITIES_REPORT || codes == AMENDED_SECURITIES_REPORT
    }

    /// Period bounds, preferring the explicit fields over the description.
    pub fn period(&self) -> (String, String) {
        let derived = match (non_empty(&self.period_start), non_empty(&self.period_end)) {
            (Some(_), Some(_)) => None,
            _ => non_empty(&self.doc_description).and_then(period_from_description),
        };
        let (derived_start, derived_end) = derived.unwrap_or_default();

        let start = non_empty(&self.period_start)
            .map(str::to_string)
            .unwrap_or(derived_start);
        let end = non_empty(&self.period_end)
            .map(str::to_string)
            .unwrap_or(derived_end);
        (start, end)
    }

    pub fn into_filing(self, payload: Vec<u8>) -> Result<Filing> {
        check_doc_id(&self.doc_id)?;
        let filer_code = non_empty(&self.edinet_code)
            .map(str::to_string)
            .ok_or_else(|| CompassError::InvalidFiling {
                doc_id: self.doc_id.clone(),
                reason: "missing filer code".to_string(),
            })?;
        let (period_start, period_end) = self.period();
        Ok(Filing {
            filer_code,
            filer_name: non_empty(&self.filer_name).unwrap_or_default().to_string(),
            doc_id: self.doc_id,
            period_start,
            period_end,
            payload,
        })
    }
}

/// One regulatory document ready for extraction.
#[derive(Clone, Serialize, Deserialize)]
pub struct Filing {
    pub filer_code: String,
    pub filer_name: String,
    pub doc_id: String,
    pub period_start: String,
    pub period_end: String,
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl std::fmt::Debug for Filing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filing")
            .field("filer_code", &self.filer_code)
            .field("filer_name", &self.filer_name)
            .field("doc_id", &self.doc_id)
            .field("period_start", &self.period_start)
            .field("period_end", &self.period_end)
            .field("payload_bytes", &self.payload.len())
            .finish()
    }
}
