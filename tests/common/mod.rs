#![allow(dead_code)]

use compass::edinet::{Filing, FilingListEntry};
use html_escape::encode_text;

pub const FILER_CODE: &str = "E00001";
pub const FILER_NAME: &str = "テスト株式会社";
pub const PERIOD_START: &str = "2023-04-01";
pub const PERIOD_END: &str = "2024-03-31";

fn cell_row(cells: &[&str]) -> String {
    let tds: String = cells
        .iter()
        .map(|c| format!("<td style=\"width:120px;\"><p>{}</p>\n</td>", c))
        .collect();
    format!("<tr>{}</tr>\n", tds)
}

/// An escaped statement table as it appears inside a filing text block.
pub fn statement_block(element: &str, unit: &str, rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from(
        "<table style=\"border-collapse: collapse; width:481.5pt;\"><colgroup><col /><col /><col /></colgroup>\n",
    );
    let unit_row = format!("(単位：{})", unit);
    html.push_str(&cell_row(&[unit_row.as_str()]));
    html.push_str(&cell_row(&["", "前連結会計年度", "当連結会計年度"]));
    for (label, previous, current) in rows {
        html.push_str(&cell_row(&[*label, *previous, *current]));
    }
    html.push_str("</table>");

    format!(
        "<{e} contextRef=\"CurrentYearDuration\">{body}</{e}>",
        e = element,
        body = encode_text(&html)
    )
}

pub fn balance_sheet_block() -> String {
    statement_block(
        "jpcrp_cor:ConsolidatedBalanceSheetTextBlock",
        "百万円",
        &[
            ("流動資産合計", "※1 10,897,603", "11,000,000"),
            ("有形固定資産合計", "0", "2,000"),
            ("無形固定資産合計", "300", "0"),
            ("投資その他の資産合計", "400", "450"),
            ("流動負債合計", "500", "550"),
            ("固定負債合計", "600", "650"),
            ("負債合計", "1,100", "1,200"),
            ("純資産合計", "700", "750"),
            ("負債純資産合計", "1,800", "1,950"),
        ],
    )
}

pub fn income_statement_block() -> String {
    statement_block(
        "jpcrp_cor:ConsolidatedStatementOfIncomeTextBlock",
        "百万円",
        &[
            ("売上高", "5,000", "6,000"),
            ("売上原価", "3,000", "3,500"),
            ("売上総利益", "2,000", "2,500"),
            ("販売費及び一般管理費", "1,500", "1,600"),
            ("営業利益", "500", "900"),
        ],
    )
}

pub fn cash_flow_block() -> String {
    statement_block(
        "jpcrp_cor:ConsolidatedStatementOfCashFlowsTextBlock",
        "百万円",
        &[
            ("営業活動によるキャッシュ・フロー", "800", "900"),
            ("投資活動によるキャッシュ・フロー", "△300", "△400"),
            ("財務活動によるキャッシュ・フロー", "△100", "200"),
            ("現金及び現金同等物の期首残高", "1,000", "1,400"),
            ("現金及び現金同等物の期末残高", "1,400", "2,100"),
        ],
    )
}

pub fn document(blocks: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xbrli:xbrl>\n{}\n</xbrli:xbrl>\n",
        blocks.join("\n")
    )
}

pub fn filing(doc_id: &str, text: &str) -> Filing {
    Filing {
        filer_code: FILER_CODE.to_string(),
        filer_name: FILER_NAME.to_string(),
        doc_id: doc_id.to_string(),
        period_start: PERIOD_START.to_string(),
        period_end: PERIOD_END.to_string(),
        payload: text.as_bytes().to_vec(),
    }
}

pub fn list_entry(doc_id: &str) -> FilingListEntry {
    FilingListEntry {
        doc_id: doc_id.to_string(),
        edinet_code: Some(FILER_CODE.to_string()),
        filer_name: Some(FILER_NAME.to_string()),
        doc_description: Some("有価証券報告書－第75期(2023/04/01－2024/03/31)".to_string()),
        period_start: None,
        period_end: None,
        form_code: Some("030000".to_string()),
        doc_type_code: Some("120".to_string()),
    }
}
