//! Change in tax liability by expanded-income bin.
//!
//! This is the distributional table shown in the report: for every income
//! bin, how many tax units pay more or less under the reform, the average
//! and total change in the chosen tax, and the effect on after-tax income.

use serde::Serialize;
use tracing::debug;

use super::distribution::INCOME_COLUMN;
use super::{AnalysisError, ensure_aligned, fill_missing};
use crate::format::format_number;
use crate::models::{IncomeBin, ResultTable, STANDARD_BINS};

/// Column used to place records into income bins.
pub const BIN_INCOME_COLUMN: &str = "expanded_income";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinDifferenceRow {
    pub bin: IncomeBin,
    /// Weighted number of tax units.
    pub count: f64,
    /// Weighted number of units whose tax falls.
    pub tax_cut: f64,
    /// Weighted number of units whose tax rises.
    pub tax_increase: f64,
    /// Average change in tax per unit.
    pub mean_change: f64,
    /// Total weighted change in tax.
    pub total_change: f64,
    /// Percentage of the overall change attributable to this bin.
    pub share_of_change: f64,
    /// Percentage change in weighted after-tax income.
    pub pct_aftertax_change: f64,
}

impl BinDifferenceRow {
    pub fn pct_tax_cut(&self) -> f64 {
        ratio(self.tax_cut, self.count) * 100.0
    }

    pub fn pct_tax_increase(&self) -> f64 {
        ratio(self.tax_increase, self.count) * 100.0
    }
}

/// One row per [`STANDARD_BINS`] entry, lowest first, then the "ALL" row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinDifferenceTable {
    pub variable: String,
    pub rows: Vec<BinDifferenceRow>,
}

impl BinDifferenceTable {
    pub fn all_row(&self) -> Option<&BinDifferenceRow> {
        self.rows.iter().find(|r| r.bin.is_all())
    }

    pub fn partition_rows(&self) -> impl Iterator<Item = &BinDifferenceRow> {
        self.rows.iter().filter(|r| !r.bin.is_all())
    }
}

/// `numerator / denominator`, or 0 when that is not finite.
fn ratio(
    numerator: f64,
    denominator: f64,
) -> f64 {
    let r = numerator / denominator;
    if r.is_finite() { r } else { 0.0 }
}

/// Build the income-bin difference table for `variable` (usually
/// `combined`).
///
/// Records are binned by baseline `expanded_income` into [`STANDARD_BINS`];
/// weights come from the base table. Missing weights and incomes count as 0.
pub fn bin_difference_table(
    base: &ResultTable,
    reform: &ResultTable,
    variable: &str,
) -> Result<BinDifferenceTable, AnalysisError> {
    ensure_aligned(base, reform)?;
    debug!(variable, "building income bin difference table");

    let income = fill_missing(base.column(BIN_INCOME_COLUMN)?);
    let weights = fill_missing(base.weights()?);
    let base_tax = base.column(variable)?;
    let reform_tax = reform.column(variable)?;
    let base_ati = fill_missing(base.column(INCOME_COLUMN)?);
    let reform_ati = fill_missing(reform.column(INCOME_COLUMN)?);

    let mut rows: Vec<BinDifferenceRow> = STANDARD_BINS
        .iter()
        .map(|bin| {
            let mut row = BinDifferenceRow {
                bin: *bin,
                count: 0.0,
                tax_cut: 0.0,
                tax_increase: 0.0,
                mean_change: 0.0,
                total_change: 0.0,
                share_of_change: 0.0,
                pct_aftertax_change: 0.0,
            };
            let mut base_ati_total = 0.0;
            let mut reform_ati_total = 0.0;

            for i in (0..base.rows()).filter(|i| bin.contains(income[*i])) {
                let w = weights[i];
                let diff = reform_tax[i] - base_tax[i];
                row.count += w;
                row.total_change += diff * w;
                if diff < 0.0 {
                    row.tax_cut += w;
                } else if diff > 0.0 {
                    row.tax_increase += w;
                }
                base_ati_total += base_ati[i] * w;
                reform_ati_total += reform_ati[i] * w;
            }

            row.mean_change = ratio(row.total_change, row.count);
            row.pct_aftertax_change =
                ratio(reform_ati_total - base_ati_total, base_ati_total) * 100.0;
            row
        })
        .collect();

    let overall = rows
        .iter()
        .find(|r| r.bin.is_all())
        .map(|r| r.total_change)
        .unwrap_or_default();
    for row in &mut rows {
        row.share_of_change = ratio(row.total_change, overall) * 100.0;
    }

    Ok(BinDifferenceTable {
        variable: variable.to_string(),
        rows,
    })
}

/// The income group that sees the largest change in tax liability, phrased
/// for the report summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestChange {
    /// e.g. "between $50K and $75K".
    pub group: String,
    /// e.g. "increase by $1,234.56".
    pub change: String,
}

/// Find the partition bin with the largest absolute total change (the first
/// one on ties) and describe its average change.
///
/// Returns `None` when the table has no partition rows with a comparable
/// total.
pub fn largest_tax_change(table: &BinDifferenceTable) -> Option<LargestChange> {
    let mut largest: Option<&BinDifferenceRow> = None;
    for row in table.partition_rows().filter(|r| !r.total_change.is_nan()) {
        match largest {
            Some(current) if row.total_change.abs() <= current.total_change.abs() => {}
            _ => largest = Some(row),
        }
    }
    let row = largest?;

    let change = if row.mean_change < 0.0 {
        format!("decrease by ${}", format_number(-row.mean_change, 2))
    } else if row.mean_change > 0.0 {
        format!("increase by ${}", format_number(row.mean_change, 2))
    } else {
        "remain the same".to_string()
    };

    Some(LargestChange {
        group: row.bin.describe(),
        change,
    })
}
