pub mod amount;
pub mod classify;
pub mod locator;
pub mod summary;
pub mod table;
pub mod validate;

pub use amount::parse_amount;
pub use locator::{locate, StatementFragment};
pub use summary::{
    build_balance_sheet, build_cash_flow, build_income_statement, BalanceSheetSummary,
    CashFlowSummary, FilingIdentity, FundamentalsRecord, IncomeStatementSummary,
    StatementSummary, TwoPeriod,
};
pub use table::{clean_fragment, extract_rows, ExtractedTable, LineItemRow};
pub use validate::Validate;
