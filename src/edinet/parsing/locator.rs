use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::edinet::statement::StatementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Consolidated,
    Solo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Standard {
    Gaap,
    Ifrs,
}

/// One tag-pair presentation of a statement inside the filing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub scope: Scope,
    pub standard: Standard,
    /// Qualified element name, e.g. `jpcrp_cor:BalanceSheetTextBlock`.
    pub element: &'static str,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            Scope::Consolidated => "consolidated",
            Scope::Solo => "solo",
        };
        let standard = match self.standard {
            Standard::Gaap => "GAAP",
            Standard::Ifrs => "IFRS",
        };
        write!(f, "{} {} ({})", scope, standard, self.element)
    }
}

const fn variant(scope: Scope, standard: Standard, element: &'static str) -> Variant {
    Variant {
        scope,
        standard,
        element,
    }
}

// Priority order matters: the first variant with content wins.
const BALANCE_SHEET_VARIANTS: &[Variant] = &[
    variant(Scope::Consolidated, Standard::Gaap, "jpcrp_cor:ConsolidatedBalanceSheetTextBlock"),
    variant(Scope::Solo, Standard::Gaap, "jpcrp_cor:BalanceSheetTextBlock"),
];

const INCOME_STATEMENT_VARIANTS: &[Variant] = &[
    variant(
        Scope::Consolidated,
        Standard::Gaap,
        "jpcrp_cor:ConsolidatedStatementOfIncomeTextBlock",
    ),
    variant(Scope::Solo, Standard::Gaap, "jpcrp_cor:StatementOfIncomeTextBlock"),
];

const CASH_FLOW_VARIANTS: &[Variant] = &[
    variant(
        Scope::Consolidated,
        Standard::Gaap,
        "jpcrp_cor:ConsolidatedStatementOfCashFlowsTextBlock",
    ),
    variant(
        Scope::Consolidated,
        Standard::Ifrs,
        "jpigp_cor:ConsolidatedStatementOfCashFlowsIFRSTextBlock",
    ),
    variant(Scope::Solo, Standard::Gaap, "jpcrp_cor:StatementOfCashFlowsTextBlock"),
    variant(Scope::Solo, Standard::Ifrs, "jpcrp_cor:StatementOfCashFlowsIFRSTextBlock"),
];

/// Candidate variants for a statement, highest priority first.
pub fn variants(statement: StatementType) -> &'static [Variant] {
    match statement {
        StatementType::BalanceSheet => BALANCE_SHEET_VARIANTS,
        StatementType::IncomeStatement => INCOME_STATEMENT_VARIANTS,
        StatementType::CashFlow => CASH_FLOW_VARIANTS,
        StatementType::Fundamentals => &[],
    }
}

static VARIANT_PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    BALANCE_SHEET_VARIANTS
        .iter()
        .chain(INCOME_STATEMENT_VARIANTS)
        .chain(CASH_FLOW_VARIANTS)
        .map(|v| {
            let element = regex::escape(v.element);
            let pattern = format!(
                r#"(?s)<{element} contextRef="CurrentYearDuration">(.*?)</{element}>"#
            );
            (v.element, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// A located sub-document for one statement variant.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementFragment {
    pub statement: StatementType,
    pub variant: Variant,
    /// Raw (still HTML-escaped) text between the open and close tags.
    pub text: String,
}

fn capture(raw_text: &str, variant: &Variant) -> Option<String> {
    VARIANT_PATTERNS
        .get(variant.element)?
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| !inner.trim().is_empty())
        .map(str::to_string)
}

/// Returns the first variant of `statement` with non-empty content.
///
/// Later variants are never consulted once one matches; `None` means the
/// filing simply has no such statement.
pub fn locate(raw_text: &str, statement: StatementType) -> Option<StatementFragment> {
    variants(statement).iter().find_map(|variant| {
        capture(raw_text, variant).map(|text| {
            log::debug!("Located {} as {}", statement.display_name(), variant);
            StatementFragment {
                statement,
                variant: *variant,
                text,
            }
        })
    })
}
