//! Reform-minus-base aggregate tax liability by tax type.

use serde::Serialize;
use tracing::debug;

use super::AnalysisError;
use crate::models::{DIFFERENCE_LABELS, ResultTable, TAX_VARIABLES, TableError, TaxType};
use crate::simulation::Simulation;

/// Aggregate change in one tax variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateDifference {
    /// Result-table column, e.g. `payrolltax`.
    pub variable: &'static str,
    /// Display name, e.g. "Payroll Tax".
    pub label: &'static str,
    pub base: f64,
    pub reform: f64,
    /// `reform - base`.
    pub difference: f64,
}

/// Whether the designated tax rises or falls under the reform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceBar {
    pub label: &'static str,
    pub value: f64,
    pub direction: Direction,
}

/// Differences reshaped for a bar chart, one bar per tax variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferencePlot {
    pub tax_type: TaxType,
    pub bars: Vec<DifferenceBar>,
}

fn weighted_sums(table: &ResultTable) -> Result<[f64; 3], TableError> {
    let mut sums = [0.0; 3];
    for (sum, variable) in sums.iter_mut().zip(TAX_VARIABLES) {
        *sum = table.weighted_sum(variable)?;
    }
    Ok(sums)
}

/// Weighted totals of `iitax`, `payrolltax` and `combined` for both
/// scenarios and their difference, in that order.
///
/// Missing values are not filled: a NaN anywhere in a column makes that
/// variable's totals NaN.
pub fn aggregate_differences(
    base: &ResultTable,
    reform: &ResultTable,
) -> Result<Vec<AggregateDifference>, AnalysisError> {
    let base_sums = weighted_sums(base)?;
    let reform_sums = weighted_sums(reform)?;

    let differences = TAX_VARIABLES
        .into_iter()
        .zip(DIFFERENCE_LABELS)
        .zip(base_sums.iter().zip(reform_sums))
        .map(|((variable, label), (base, reform))| AggregateDifference {
            variable,
            label,
            base: *base,
            reform,
            difference: reform - base,
        })
        .collect();

    Ok(differences)
}

/// [`aggregate_differences`] for one simulated year.
pub fn differences_for_year<S: Simulation + ?Sized>(
    simulation: &S,
    year: i32,
) -> Result<Vec<AggregateDifference>, AnalysisError> {
    debug!(year, "computing aggregate differences");
    let base = simulation.base_results(year)?;
    let reform = simulation.reform_results(year)?;
    aggregate_differences(base, reform)
}

/// Shape `differences` for the aggregate liability chart.
///
/// `tax_type` must be `income`, `payroll` or `combined`. Every bar takes its
/// direction from the sign of that one tax's difference, not its own.
pub fn difference_plot(
    differences: &[AggregateDifference],
    tax_type: &str,
) -> Result<DifferencePlot, AnalysisError> {
    let tax_type: TaxType = tax_type.parse()?;

    let designated = differences
        .iter()
        .find(|d| d.variable == tax_type.variable())
        .ok_or_else(|| TableError::MissingColumn(tax_type.variable().to_string()))?;

    let direction = if designated.difference < 0.0 {
        Direction::Decrease
    } else {
        Direction::Increase
    };

    let bars = differences
        .iter()
        .map(|d| DifferenceBar {
            label: d.label,
            value: d.difference,
            direction,
        })
        .collect();

    Ok(DifferencePlot { tax_type, bars })
}
