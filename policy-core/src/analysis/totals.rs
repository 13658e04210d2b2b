//! Multi-year aggregate tables.

use serde::Serialize;

use super::{AnalysisError, differences_for_year};
use crate::simulation::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    pub base: f64,
    pub reform: f64,
    pub difference: f64,
}

/// Base, reform and difference totals of one variable for every year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedTotals {
    pub variable: String,
    pub years: Vec<YearTotals>,
}

impl WeightedTotals {
    /// Sum of the yearly differences over the whole budget window.
    pub fn total_difference(&self) -> f64 {
        self.years.iter().map(|y| y.difference).sum()
    }
}

/// Weighted totals of `variable` for each simulated year.
pub fn weighted_totals<S: Simulation + ?Sized>(
    simulation: &S,
    variable: &str,
) -> Result<WeightedTotals, AnalysisError> {
    let mut years = Vec::new();
    for year in simulation.years() {
        let base = simulation.base_results(year)?.weighted_sum(variable)?;
        let reform = simulation.reform_results(year)?.weighted_sum(variable)?;
        years.push(YearTotals {
            year,
            base,
            reform,
            difference: reform - base,
        });
    }

    Ok(WeightedTotals {
        variable: variable.to_string(),
        years,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxTypeRow {
    pub label: &'static str,
    /// One difference per entry of [`TaxTypeTable::years`].
    pub values: Vec<f64>,
}

/// Aggregate differences by tax type (rows) and year (columns).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxTypeTable {
    pub years: Vec<i32>,
    pub rows: Vec<TaxTypeRow>,
}

/// Run the aggregate-difference reducer for every year and lay the results
/// out with one row per tax variable.
pub fn tax_type_table<S: Simulation + ?Sized>(simulation: &S) -> Result<TaxTypeTable, AnalysisError> {
    let years: Vec<i32> = simulation.years().collect();
    let mut rows: Vec<TaxTypeRow> = Vec::new();

    for year in &years {
        let differences = differences_for_year(simulation, *year)?;
        if rows.is_empty() {
            rows = differences
                .iter()
                .map(|d| TaxTypeRow {
                    label: d.label,
                    values: Vec::with_capacity(years.len()),
                })
                .collect();
        }
        for (row, difference) in rows.iter_mut().zip(&differences) {
            row.values.push(difference.difference);
        }
    }

    Ok(TaxTypeTable { years, rows })
}
