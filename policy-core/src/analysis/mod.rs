//! Summaries computed from base and reform simulation results.
//!
//! Every function here is a pure reduction over [`ResultTable`]s. Nothing
//! is cached between calls.

pub mod bin_table;
pub mod differences;
pub mod distribution;
pub mod notable;
pub mod totals;

use thiserror::Error;

use crate::models::{InvalidTaxType, ResultTable, TableError};
use crate::simulation::SimulationError;

pub use bin_table::{BinDifferenceRow, BinDifferenceTable, LargestChange, bin_difference_table, largest_tax_change};
pub use differences::{
    AggregateDifference, DifferenceBar, DifferencePlot, Direction, aggregate_differences,
    difference_plot, differences_for_year,
};
pub use distribution::{BinDistribution, CategoryShares, distribution_for_year, distribution_table};
pub use notable::notable_changes;
pub use totals::{TaxTypeRow, TaxTypeTable, WeightedTotals, YearTotals, tax_type_table, weighted_totals};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("base results have {base} rows but reform results have {reform}")]
    RowMismatch { base: usize, reform: usize },

    #[error(transparent)]
    InvalidTaxType(#[from] InvalidTaxType),

    #[error("result table error: {0}")]
    Table(#[from] TableError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// Base and reform results must describe the same records in the same order.
pub(crate) fn ensure_aligned(
    base: &ResultTable,
    reform: &ResultTable,
) -> Result<(), AnalysisError> {
    if base.rows() != reform.rows() {
        return Err(AnalysisError::RowMismatch {
            base: base.rows(),
            reform: reform.rows(),
        });
    }
    Ok(())
}

/// Copy of `values` with missing (non-finite) entries read as 0.
pub(crate) fn fill_missing(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect()
}
