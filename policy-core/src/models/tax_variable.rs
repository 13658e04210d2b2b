use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result-table columns summarized by the aggregate-difference reducer.
pub const TAX_VARIABLES: [&str; 3] = ["iitax", "payrolltax", "combined"];

/// Display names for [`TAX_VARIABLES`], position for position.
pub const DIFFERENCE_LABELS: [&str; 3] = ["Income Tax", "Payroll Tax", "Combined"];

const ACCEPTABLE_TAX_TYPES: [&str; 3] = ["income", "payroll", "combined"];

/// Raised when a tax-type selector is not one of `income`, `payroll`, `combined`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("tax_type must be one of the following: [\"income\", \"payroll\", \"combined\"], got '{0}'")]
pub struct InvalidTaxType(pub String);

/// Selector for the tax whose liability drives a differences chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    Income,
    Payroll,
    Combined,
}

impl TaxType {
    fn position(self) -> usize {
        match self {
            Self::Income => 0,
            Self::Payroll => 1,
            Self::Combined => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        ACCEPTABLE_TAX_TYPES[self.position()]
    }

    /// The result-table column holding this tax.
    pub fn variable(self) -> &'static str {
        TAX_VARIABLES[self.position()]
    }

    /// Capitalized name for chart titles ("Payroll").
    pub fn title(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Payroll => "Payroll",
            Self::Combined => "Combined",
        }
    }
}

impl FromStr for TaxType {
    type Err = InvalidTaxType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "payroll" => Ok(Self::Payroll),
            "combined" => Ok(Self::Combined),
            other => Err(InvalidTaxType(other.to_string())),
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
