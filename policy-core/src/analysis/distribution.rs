//! Distribution of after-tax income changes across income bins.
//!
//! For each income bin this reports the share of the (weighted) population
//! whose after-tax income rose or fell by more than 5%, by 1-5%, or changed
//! by less than 1%. The result feeds the stacked horizontal bar chart in the
//! report.
//!
//! # Example
//!
//! ```
//! use policy_core::analysis::distribution_table;
//! use policy_core::{ChangeCategory, ResultTable};
//!
//! let base = ResultTable::from_columns([
//!     ("s006", vec![1.0, 1.0]),
//!     ("aftertax_income", vec![10_000.0, 60_000.0]),
//! ])
//! .unwrap();
//! let reform = ResultTable::from_columns([
//!     ("s006", vec![1.0, 1.0]),
//!     ("aftertax_income", vec![10_300.0, 57_000.0]),
//! ])
//! .unwrap();
//!
//! let rows = distribution_table(&base, &reform).unwrap();
//!
//! assert_eq!(rows.len(), 12);
//! // $10,000 is the inclusive upper edge of the lowest bin
//! assert_eq!(rows[0].label, "Less than $10K");
//! assert_eq!(rows[0].shares.get(ChangeCategory::SmallIncrease), 1.0);
//! assert_eq!(rows[5].label, "$50K-75K");
//! assert_eq!(rows[5].shares.get(ChangeCategory::LargeDecrease), 1.0);
//! ```

use serde::Serialize;
use tracing::debug;

use super::{AnalysisError, ensure_aligned, fill_missing};
use crate::models::{ChangeCategory, IncomeBin, ResultTable};
use crate::simulation::Simulation;

/// Column holding after-tax income in both result tables.
pub const INCOME_COLUMN: &str = "aftertax_income";

/// Population share in each [`ChangeCategory`], indexed by
/// [`ChangeCategory::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryShares([f64; 5]);

impl CategoryShares {
    pub fn get(
        &self,
        category: ChangeCategory,
    ) -> f64 {
        self.0[category.index()]
    }

    /// Shares in [`ChangeCategory::ALL`] order.
    pub fn as_array(&self) -> [f64; 5] {
        self.0
    }

    /// 1.0 for a populated bin, 0.0 for an empty one.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// One income bin of the distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinDistribution {
    pub label: &'static str,
    /// Total sampling weight of the records in the bin.
    pub population: f64,
    pub shares: CategoryShares,
}

/// Percent change from `base` to `reform`, with non-finite results
/// (zero or missing base income) replaced by 0.
pub fn percent_changes(
    base: &[f64],
    reform: &[f64],
) -> Vec<f64> {
    base.iter()
        .zip(reform)
        .map(|(b, r)| {
            let pct = (r - b) / b * 100.0;
            if pct.is_finite() { pct } else { 0.0 }
        })
        .collect()
}

/// Bucket every record into income bins by baseline after-tax income and
/// return the population shares per change category.
///
/// Rows come back lowest bin first and "All" last, twelve in total. Weights
/// are taken from the base table. A bin with no weight gets all-zero shares.
/// Missing weights and incomes count as 0.
///
/// # Errors
///
/// * [`AnalysisError::RowMismatch`] if the tables differ in length.
/// * [`AnalysisError::Table`] if `s006` or `aftertax_income` is missing.
pub fn distribution_table(
    base: &ResultTable,
    reform: &ResultTable,
) -> Result<Vec<BinDistribution>, AnalysisError> {
    ensure_aligned(base, reform)?;

    let base_income = fill_missing(base.column(INCOME_COLUMN)?);
    let reform_income = fill_missing(reform.column(INCOME_COLUMN)?);
    let weights = fill_missing(base.weights()?);
    let pct_change = percent_changes(&base_income, &reform_income);

    let rows = IncomeBin::display_order()
        .map(|bin| bin_distribution(bin, &base_income, &pct_change, &weights))
        .collect();

    Ok(rows)
}

/// [`distribution_table`] for one simulated year.
pub fn distribution_for_year<S: Simulation + ?Sized>(
    simulation: &S,
    year: i32,
) -> Result<Vec<BinDistribution>, AnalysisError> {
    debug!(year, "computing income change distribution");
    let base = simulation.base_results(year)?;
    let reform = simulation.reform_results(year)?;
    distribution_table(base, reform)
}

fn bin_distribution(
    bin: &IncomeBin,
    base_income: &[f64],
    pct_change: &[f64],
    weights: &[f64],
) -> BinDistribution {
    let mut sums = [0.0; 5];
    let mut population = 0.0;

    for ((_, pct), weight) in base_income
        .iter()
        .zip(pct_change)
        .zip(weights)
        .filter(|((income, _), _)| bin.contains(**income))
    {
        population += weight;
        sums[ChangeCategory::classify(*pct).index()] += weight;
    }

    let shares = if population == 0.0 {
        [0.0; 5]
    } else {
        sums.map(|s| s / population)
    };

    BinDistribution {
        label: bin.label,
        population,
        shares: CategoryShares(shares),
    }
}
