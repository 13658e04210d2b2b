//! Detection of aggregate variables that move by more than a threshold.

use tracing::debug;

use super::AnalysisError;
use crate::models::ResultTable;
use crate::simulation::Simulation;

/// Variables checked for notable changes, with their report descriptions.
///
/// A `count_` prefix means "weighted number of units with a non-zero value"
/// of the variable that follows.
pub const NOTABLE_VARIABLES: [(&str, &str); 18] = [
    ("c00100", "AGI"),
    ("count_standard", "Number of standard deduction filers"),
    ("standard", "Standard deduction amount"),
    ("count_c04470", "Number of itemizers"),
    ("c04470", "Total itemized deductions"),
    ("c04600", "Personal exemptions"),
    ("c04800", "Taxable income"),
    ("c62100", "Total AMT income"),
    ("count_c09600", "Number of AMT filers"),
    ("c09600", "Total AMT"),
    ("c05800", "Total tax liability before credits"),
    ("c07100", "Total non-refundable credits"),
    ("refund", "Total refundable credits"),
    ("ubi", "Universal Basic Income"),
    ("benefit_cost_total", "Spending on benefit programs"),
    ("benefit_value_total", "Consumption value of benefits"),
    ("expanded_income", "Expanded income"),
    ("aftertax_income", "After-tax income"),
];

fn total(
    table: &ResultTable,
    variable: &str,
) -> Result<f64, AnalysisError> {
    let value = match variable.strip_prefix("count_") {
        Some(column) => table.weighted_nonzero_count(column)?,
        None => table.weighted_sum(variable)?,
    };
    Ok(value)
}

fn column_of(variable: &str) -> &str {
    variable.strip_prefix("count_").unwrap_or(variable)
}

/// Describe every catalogued variable whose largest year-over-baseline
/// percentage change reaches `threshold` (a fraction, e.g. `0.05`).
///
/// The largest change is the maximum over years (first year on ties), so a
/// variable only qualifies through a decrease when it falls in every year.
/// Variables missing from the results are skipped.
pub fn notable_changes<S: Simulation + ?Sized>(
    simulation: &S,
    threshold: f64,
) -> Result<Vec<String>, AnalysisError> {
    let mut notable = Vec::new();

    for (variable, description) in NOTABLE_VARIABLES {
        let column = column_of(variable);
        let first = simulation.start_year();
        if !simulation.base_results(first)?.has_column(column)
            || !simulation.reform_results(first)?.has_column(column)
        {
            debug!(variable, "variable not in results, skipping");
            continue;
        }

        let mut max_change: Option<(i32, f64)> = None;
        for year in simulation.years() {
            let base = total(simulation.base_results(year)?, variable)?;
            let reform = total(simulation.reform_results(year)?, variable)?;
            let pct = (reform - base) / base;
            let pct = if pct.is_finite() { pct } else { 0.0 };
            match max_change {
                Some((_, current)) if pct <= current => {}
                _ => max_change = Some((year, pct)),
            }
        }

        if let Some((year, pct)) = max_change {
            if pct.abs() >= threshold {
                let direction = if pct < 0.0 { "decreases" } else { "increases" };
                notable.push(format!(
                    "{description} {direction} by {:.2}% in {year}",
                    pct.abs() * 100.0
                ));
            }
        }
    }

    if notable.is_empty() {
        notable.push(format!(
            "No notable variables changed by more than {:.2}%",
            threshold * 100.0
        ));
    }

    Ok(notable)
}
