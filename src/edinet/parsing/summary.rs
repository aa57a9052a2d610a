use serde::{Deserialize, Serialize};

use super::classify::{
    classify_balance_sheet_row, classify_cash_flow_row, IncomeStatementClassifier,
};
use super::table::ExtractedTable;
use crate::edinet::filing::Filing;

/// Prior-period and current-period values of one line item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoPeriod {
    pub previous: i64,
    pub current: i64,
}

impl TwoPeriod {
    pub fn new(previous: i64, current: i64) -> Self {
        Self { previous, current }
    }

    /// A field counts as present when either period is non-zero.
    pub fn is_present(&self) -> bool {
        self.previous != 0 || self.current != 0
    }
}

/// Company and period bounds shared by every summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingIdentity {
    pub company_name: String,
    pub period_start: String,
    pub period_end: String,
}

impl FilingIdentity {
    pub fn from_filing(filing: &Filing) -> Self {
        Self {
            company_name: filing.filer_name.clone(),
            period_start: filing.period_start.clone(),
            period_end: filing.period_end.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.company_name.is_empty()
            && !self.period_start.is_empty()
            && !self.period_end.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSummary {
    #[serde(flatten)]
    pub identity: FilingIdentity,
    pub unit_string: String,
    pub current_assets: TwoPeriod,
    pub tangible_assets: TwoPeriod,
    pub intangible_assets: TwoPeriod,
    pub investments_and_other_assets: TwoPeriod,
    pub current_liabilities: TwoPeriod,
    pub fixed_liabilities: TwoPeriod,
    pub net_assets: TwoPeriod,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementSummary {
    #[serde(flatten)]
    pub identity: FilingIdentity,
    pub unit_string: String,
    pub cost_of_goods_sold: TwoPeriod,
    pub sga: TwoPeriod,
    pub sales: TwoPeriod,
    pub operating_profit: TwoPeriod,
    pub operating_revenue: TwoPeriod,
    pub has_operating_revenue: bool,
    pub operating_cost: TwoPeriod,
    pub has_operating_cost: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    #[serde(flatten)]
    pub identity: FilingIdentity,
    pub unit_string: String,
    pub operating_cf: TwoPeriod,
    pub investing_cf: TwoPeriod,
    pub financing_cf: TwoPeriod,
    pub start_cash: TwoPeriod,
    pub end_cash: TwoPeriod,
}

/// Cross-statement figures for ratio analysis; current period only.
///
/// Filled by both the balance-sheet and income-statement passes of a single
/// filing, so it is owned by that filing's task and passed by `&mut`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    #[serde(flatten)]
    pub identity: FilingIdentity,
    pub sales: i64,
    pub operating_revenue: i64,
    pub has_operating_revenue: bool,
    pub operating_cost: i64,
    pub has_operating_cost: bool,
    pub operating_profit: i64,
    pub liabilities: i64,
    pub net_assets: i64,
}

impl FundamentalsRecord {
    pub fn new(identity: FilingIdentity) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }
}

/// A built summary of one located statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatementSummary {
    BalanceSheet(BalanceSheetSummary),
    IncomeStatement(IncomeStatementSummary),
    CashFlow(CashFlowSummary),
}

impl StatementSummary {
    pub fn identity(&self) -> &FilingIdentity {
        match self {
            StatementSummary::BalanceSheet(s) => &s.identity,
            StatementSummary::IncomeStatement(s) => &s.identity,
            StatementSummary::CashFlow(s) => &s.identity,
        }
    }
}

pub fn build_balance_sheet(
    identity: FilingIdentity,
    table: &ExtractedTable,
    fundamentals: &mut FundamentalsRecord,
) -> BalanceSheetSummary {
    let mut summary = BalanceSheetSummary {
        identity,
        unit_string: table.unit.clone(),
        ..Default::default()
    };
    for row in &table.rows {
        classify_balance_sheet_row(&mut summary, fundamentals, row);
    }
    summary
}

pub fn build_income_statement(
    identity: FilingIdentity,
    table: &ExtractedTable,
    fundamentals: &mut FundamentalsRecord,
) -> IncomeStatementSummary {
    let mut summary = IncomeStatementSummary {
        identity,
        unit_string: table.unit.clone(),
        ..Default::default()
    };
    let mut classifier = IncomeStatementClassifier::default();
    for row in &table.rows {
        classifier.classify(&mut summary, fundamentals, row);
    }
    summary
}

pub fn build_cash_flow(identity: FilingIdentity, table: &ExtractedTable) -> CashFlowSummary {
    let mut summary = CashFlowSummary {
        identity,
        unit_string: table.unit.clone(),
        ..Default::default()
    };
    for row in &table.rows {
        classify_cash_flow_row(&mut summary, row);
    }
    summary
}
