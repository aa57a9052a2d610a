//! Maps statement row labels to summary fields.
//!
//! Each statement has a declarative rule table evaluated in order. Balance
//! sheet and cash flow rows take the first rule that accepts the label;
//! income statement rows apply every accepting rule, so a label such as
//! `営業収益（売上高）` updates both sales and operating revenue.

use super::summary::{
    BalanceSheetSummary, CashFlowSummary, FundamentalsRecord, IncomeStatementSummary, TwoPeriod,
};
use super::table::LineItemRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl LabelMatch {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatch::Exact(expected) => label == *expected,
            LabelMatch::Contains(stem) => label.contains(stem),
        }
    }
}

/// Every target whose matcher accepts `label`, in table order.
pub fn all_matches<'a, T: Copy>(
    rules: &'a [(LabelMatch, T)],
    label: &'a str,
) -> impl Iterator<Item = T> + 'a {
    rules
        .iter()
        .filter(move |(matcher, _)| matcher.matches(label))
        .map(|(_, target)| *target)
}

/// First target whose matcher accepts `label`.
pub fn first_match<T: Copy>(rules: &[(LabelMatch, T)], label: &str) -> Option<T> {
    rules
        .iter()
        .find(|(matcher, _)| matcher.matches(label))
        .map(|(_, target)| *target)
}

fn two_period(row: &LineItemRow) -> TwoPeriod {
    TwoPeriod::new(row.previous, row.current)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSheetField {
    CurrentAssets,
    TangibleAssets,
    IntangibleAssets,
    InvestmentsAndOtherAssets,
    CurrentLiabilities,
    FixedLiabilities,
    NetAssets,
    /// Feeds the fundamentals record only.
    Liabilities,
}

// Totals are matched exactly: "負債合計" is a substring of "流動負債合計",
// and "純資産合計" of "負債純資産合計".
pub const BALANCE_SHEET_RULES: &[(LabelMatch, BalanceSheetField)] = &[
    (LabelMatch::Exact("流動資産合計"), BalanceSheetField::CurrentAssets),
    (LabelMatch::Exact("有形固定資産合計"), BalanceSheetField::TangibleAssets),
    (LabelMatch::Exact("無形固定資産合計"), BalanceSheetField::IntangibleAssets),
    (LabelMatch::Exact("投資その他の資産合計"), BalanceSheetField::InvestmentsAndOtherAssets),
    (LabelMatch::Exact("流動負債合計"), BalanceSheetField::CurrentLiabilities),
    (LabelMatch::Exact("固定負債合計"), BalanceSheetField::FixedLiabilities),
    (LabelMatch::Exact("純資産合計"), BalanceSheetField::NetAssets),
    (LabelMatch::Exact("負債合計"), BalanceSheetField::Liabilities),
];

pub fn classify_balance_sheet_row(
    summary: &mut BalanceSheetSummary,
    fundamentals: &mut FundamentalsRecord,
    row: &LineItemRow,
) {
    let Some(field) = first_match(BALANCE_SHEET_RULES, &row.label) else {
        return;
    };
    let value = two_period(row);
    match field {
        BalanceSheetField::CurrentAssets => summary.current_assets = value,
        BalanceSheetField::TangibleAssets => summary.tangible_assets = value,
        BalanceSheetField::IntangibleAssets => summary.intangible_assets = value,
        BalanceSheetField::InvestmentsAndOtherAssets => {
            summary.investments_and_other_assets = value
        }
        BalanceSheetField::CurrentLiabilities => summary.current_liabilities = value,
        BalanceSheetField::FixedLiabilities => summary.fixed_liabilities = value,
        BalanceSheetField::NetAssets => {
            summary.net_assets = value;
            fundamentals.net_assets = row.current;
        }
        BalanceSheetField::Liabilities => fundamentals.liabilities = row.current,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeStatementField {
    /// Fallback for filers that only report a loss line.
    OperatingLossOnly,
    CostOfGoodsSold,
    SellingGeneralAndAdministrative,
    Sales,
    OperatingProfit,
    OperatingRevenue,
    OperatingCost,
}

pub const OPERATING_LOSS_LABEL: &str = "営業損失（△）";
pub const OPERATING_REVENUE_TOTAL_LABEL: &str = "営業収益合計";
pub const OPERATING_COST_TOTAL_LABEL: &str = "営業費用合計";

pub const INCOME_STATEMENT_RULES: &[(LabelMatch, IncomeStatementField)] = &[
    (LabelMatch::Contains("売上原価"), IncomeStatementField::CostOfGoodsSold),
    (
        LabelMatch::Contains("販売費及び一般管理費"),
        IncomeStatementField::SellingGeneralAndAdministrative,
    ),
    (LabelMatch::Contains("売上高"), IncomeStatementField::Sales),
    (LabelMatch::Contains("営業利益"), IncomeStatementField::OperatingProfit),
    (LabelMatch::Exact(OPERATING_LOSS_LABEL), IncomeStatementField::OperatingLossOnly),
    (LabelMatch::Contains("営業収益"), IncomeStatementField::OperatingRevenue),
    (LabelMatch::Contains("営業費用"), IncomeStatementField::OperatingCost),
];

/// Income-statement classification with the operating revenue/cost latches.
///
/// Revenue and cost rows overwrite their field on every match until the
/// exact "…合計" row of that category is seen; after that the category is
/// closed for the rest of the table.
#[derive(Debug, Default)]
pub struct IncomeStatementClassifier {
    revenue_closed: bool,
    cost_closed: bool,
}

impl IncomeStatementClassifier {
    pub fn classify(
        &mut self,
        summary: &mut IncomeStatementSummary,
        fundamentals: &mut FundamentalsRecord,
        row: &LineItemRow,
    ) {
        for field in all_matches(INCOME_STATEMENT_RULES, &row.label) {
            self.apply(field, summary, fundamentals, row);
        }
    }

    fn apply(
        &mut self,
        field: IncomeStatementField,
        summary: &mut IncomeStatementSummary,
        fundamentals: &mut FundamentalsRecord,
        row: &LineItemRow,
    ) {
        let value = two_period(row);
        match field {
            IncomeStatementField::OperatingLossOnly => {
                if summary.operating_profit.previous == 0 {
                    summary.operating_profit.previous = row.previous;
                }
                if summary.operating_profit.current == 0 {
                    summary.operating_profit.current = row.current;
                }
                if fundamentals.operating_profit == 0 {
                    fundamentals.operating_profit = row.current;
                }
            }
            IncomeStatementField::CostOfGoodsSold => summary.cost_of_goods_sold = value,
            IncomeStatementField::SellingGeneralAndAdministrative => summary.sga = value,
            IncomeStatementField::Sales => {
                summary.sales = value;
                fundamentals.sales = row.current;
            }
            IncomeStatementField::OperatingProfit => {
                summary.operating_profit = value;
                fundamentals.operating_profit = row.current;
            }
            IncomeStatementField::OperatingRevenue => {
                if self.revenue_closed {
                    return;
                }
                summary.has_operating_revenue = true;
                summary.operating_revenue = value;
                fundamentals.has_operating_revenue = true;
                fundamentals.operating_revenue = row.current;
                if row.label == OPERATING_REVENUE_TOTAL_LABEL {
                    self.revenue_closed = true;
                }
            }
            IncomeStatementField::OperatingCost => {
                if self.cost_closed {
                    return;
                }
                summary.has_operating_cost = true;
                summary.operating_cost = value;
                fundamentals.has_operating_cost = true;
                fundamentals.operating_cost = row.current;
                if row.label == OPERATING_COST_TOTAL_LABEL {
                    self.cost_closed = true;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowField {
    Operating,
    Investing,
    Financing,
    StartCash,
    EndCash,
}

pub const CASH_FLOW_RULES: &[(LabelMatch, CashFlowField)] = &[
    (LabelMatch::Contains("営業活動による"), CashFlowField::Operating),
    (LabelMatch::Contains("投資活動による"), CashFlowField::Investing),
    (LabelMatch::Contains("財務活動による"), CashFlowField::Financing),
    (LabelMatch::Contains("期首残高"), CashFlowField::StartCash),
    (LabelMatch::Contains("期末残高"), CashFlowField::EndCash),
];

pub fn classify_cash_flow_row(summary: &mut CashFlowSummary, row: &LineItemRow) {
    let Some(field) = first_match(CASH_FLOW_RULES, &row.label) else {
        return;
    };
    let value = two_period(row);
    match field {
        CashFlowField::Operating => summary.operating_cf = value,
        CashFlowField::Investing => summary.investing_cf = value,
        CashFlowField::Financing => summary.financing_cf = value,
        CashFlowField::StartCash => summary.start_cash = value,
        CashFlowField::EndCash => summary.end_cash = value,
    }
}
