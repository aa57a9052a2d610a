use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::amount::parse_amount;

/// Marker of the unit declaration row, e.g. `(単位：百万円)`.
pub const UNIT_MARKER: &str = "単位：";
const UNIT_SEPARATOR: char = '：';

static TABLE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<table(.*?)>").unwrap());
static WIDTH_SEMICOLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"width(.*?);").unwrap());
static WIDTH_PT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"width(.*?)pt").unwrap());
static WIDTH_PX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"width(.*?)px").unwrap());
static COLGROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<colgroup(.*?)</colgroup>").unwrap());

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// One parsed statement row with its two reporting periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRow {
    pub label: String,
    pub previous: i64,
    pub current: i64,
}

/// Rows of a statement table plus the declared reporting unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    pub rows: Vec<LineItemRow>,
    /// Empty when the table carries no unit declaration.
    pub unit: String,
}

/// Unescapes a located fragment and strips presentational table markup.
///
/// The result is what gets stored as the HTML artifact and what the row
/// extractor parses.
pub fn clean_fragment(raw: &str) -> String {
    let mut text = decode_html_entities(raw).into_owned();
    // Double-escaped apostrophes survive one round of decoding
    text = text.replace("&apos;", "'");
    format_html_table(&text)
}

/// Removes the inline width of the outer `<table>` and every `<colgroup>`.
pub fn format_html_table(html: &str) -> String {
    let mut result = html.to_string();

    if let Some(table_tag) = TABLE_OPEN_RE.find(html).map(|m| m.as_str()) {
        let width = [&*WIDTH_SEMICOLON_RE, &*WIDTH_PT_RE, &*WIDTH_PX_RE]
            .iter()
            .find_map(|re| re.find(table_tag));
        if let Some(width) = width {
            let new_tag = table_tag.replace(width.as_str(), "");
            result = result.replace(table_tag, &new_tag);
        }
    }

    COLGROUP_RE.replace_all(&result, "").into_owned()
}

fn unit_from_segment(segment: &str) -> Option<String> {
    let stripped: String = segment
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '（' | '）'))
        .collect();
    stripped
        .split(UNIT_SEPARATOR)
        .nth(1)
        .map(|unit| unit.trim().to_string())
        .filter(|unit| !unit.is_empty())
}

/// Parses every `<tr>` of a cleaned fragment into line items.
///
/// A row is a line item when its cells yield at least three non-empty text
/// lines and the second and third both parse as amounts. A row consisting
/// of a single line containing [`UNIT_MARKER`] sets the unit; the last one
/// seen wins.
pub fn extract_rows(html: &str) -> ExtractedTable {
    let document = Html::parse_fragment(html);
    let mut table = ExtractedTable::default();

    for row in document.select(&ROW_SELECTOR) {
        let text: String = row
            .select(&CELL_SELECTOR)
            .flat_map(|cell| cell.text())
            .collect();
        let segments: Vec<&str> = text
            .split('\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [label, previous, current, ..] => {
                let (Ok(previous), Ok(current)) = (parse_amount(previous), parse_amount(current))
                else {
                    continue;
                };
                table.rows.push(LineItemRow {
                    label: label.to_string(),
                    previous,
                    current,
                });
            }
            [only] if only.contains(UNIT_MARKER) => {
                if let Some(unit) = unit_from_segment(only) {
                    table.unit = unit;
                }
            }
            _ => {}
        }
    }

    table
}
