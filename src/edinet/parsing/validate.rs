use super::summary::{
    BalanceSheetSummary, CashFlowSummary, FundamentalsRecord, IncomeStatementSummary,
    StatementSummary,
};

/// Completeness predicate deciding whether a summary may be published.
pub trait Validate {
    fn is_valid(&self) -> bool;
}

impl Validate for BalanceSheetSummary {
    fn is_valid(&self) -> bool {
        self.identity.is_complete()
            && [
                &self.current_assets,
                &self.tangible_assets,
                &self.intangible_assets,
                &self.investments_and_other_assets,
                &self.current_liabilities,
                &self.fixed_liabilities,
                &self.net_assets,
            ]
            .iter()
            .all(|field| field.is_present())
    }
}

impl Validate for IncomeStatementSummary {
    fn is_valid(&self) -> bool {
        let revenue_path = self.has_operating_revenue
            && self.has_operating_cost
            && self.operating_revenue.is_present()
            && self.operating_cost.is_present();

        let standard_path = self.identity.is_complete()
            && self.cost_of_goods_sold.is_present()
            && self.sga.is_present()
            && self.sales.is_present()
            && self.operating_profit.is_present();

        revenue_path || standard_path
    }
}

impl Validate for CashFlowSummary {
    fn is_valid(&self) -> bool {
        self.identity.is_complete()
            && self.operating_cf.is_present()
            && self.investing_cf.is_present()
            && self.financing_cf.is_present()
            && self.start_cash.is_present()
            && self.end_cash.is_present()
    }
}

impl Validate for FundamentalsRecord {
    fn is_valid(&self) -> bool {
        if !self.identity.is_complete() {
            return false;
        }
        let shared = self.operating_profit != 0 && self.liabilities != 0 && self.net_assets != 0;

        let revenue_path = self.has_operating_revenue
            && self.has_operating_cost
            && shared
            && self.operating_revenue != 0
            && self.operating_cost != 0;

        let sales_path = shared && self.sales != 0;

        revenue_path || sales_path
    }
}

impl Validate for StatementSummary {
    fn is_valid(&self) -> bool {
        match self {
            StatementSummary::BalanceSheet(s) => s.is_valid(),
            StatementSummary::IncomeStatement(s) => s.is_valid(),
            StatementSummary::CashFlow(s) => s.is_valid(),
        }
    }
}
