use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// The derived artifacts produced for one filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
    Fundamentals,
}

impl StatementType {
    /// Path segment and file-name component used in artifact keys.
    pub fn label(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "BS",
            StatementType::IncomeStatement => "PL",
            StatementType::CashFlow => "CF",
            StatementType::Fundamentals => "Fundamentals",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "balance sheet",
            StatementType::IncomeStatement => "income statement",
            StatementType::CashFlow => "cash-flow statement",
            StatementType::Fundamentals => "fundamentals",
        }
    }

    /// Statement types that are located inside the filing text.
    pub fn located() -> [StatementType; 3] {
        [
            StatementType::BalanceSheet,
            StatementType::IncomeStatement,
            StatementType::CashFlow,
        ]
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BS" => Ok(StatementType::BalanceSheet),
            "PL" => Ok(StatementType::IncomeStatement),
            "CF" => Ok(StatementType::CashFlow),
            "FUNDAMENTALS" => Ok(StatementType::Fundamentals),
            _ => Err(format!(
                "Unknown statement type: {} (expected one of {})",
                s,
                StatementType::list_types()
            )),
        }
    }
}

impl TryFrom<String> for StatementType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StatementType::from_str(&s)
    }
}

impl From<StatementType> for String {
    fn from(st: StatementType) -> Self {
        st.label().to_string()
    }
}

pub static STATEMENT_TYPES: Lazy<String> = Lazy::new(|| {
    StatementType::iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
});

impl StatementType {
    pub fn list_types() -> &'static str {
        &STATEMENT_TYPES
    }
}

/// Serialized form of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    Json,
    Html,
}

impl ArtifactFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> mime::Mime {
        match self {
            ArtifactFormat::Json => mime::APPLICATION_JSON,
            ArtifactFormat::Html => mime::TEXT_HTML,
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ArtifactFormat::Json),
            "html" => Ok(ArtifactFormat::Html),
            _ => Err(format!("Unsupported artifact format: {}", s)),
        }
    }
}
