//! Column-oriented table of per-record simulation output.
//!
//! Each row is one simulated tax unit. Every column holds `f64` values; an
//! absent value is stored as NaN and propagates through any sum it enters.

use std::collections::BTreeMap;

use thiserror::Error;

/// Name of the sampling-weight column.
pub const WEIGHT_COLUMN: &str = "s006";

/// Errors raised when building or reading a [`ResultTable`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' defined twice")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs.
    ///
    /// All columns must have the same length and distinct names.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    /// Add a column. The first column fixes the row count of the table.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }
        self.rows = values.len();
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in alphabetical order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<&[f64], TableError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// The sampling weights (`s006`).
    pub fn weights(&self) -> Result<&[f64], TableError> {
        self.column(WEIGHT_COLUMN)
    }

    /// Population-weighted total of `name`: `Σ value · weight`.
    pub fn weighted_sum(&self, name: &str) -> Result<f64, TableError> {
        let values = self.column(name)?;
        let weights = self.weights()?;
        Ok(values.iter().zip(weights).map(|(v, w)| v * w).sum())
    }

    /// Total weight of the records whose `name` value is non-zero.
    ///
    /// NaN counts as non-zero.
    pub fn weighted_nonzero_count(&self, name: &str) -> Result<f64, TableError> {
        let values = self.column(name)?;
        let weights = self.weights()?;
        Ok(values
            .iter()
            .zip(weights)
            .filter(|(v, _)| **v != 0.0)
            .map(|(_, w)| w)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> ResultTable {
        ResultTable::from_columns([
            (WEIGHT_COLUMN, vec![1.0, 2.0, 3.0]),
            ("iitax", vec![100.0, 0.0, -50.0]),
        ])
        .unwrap()
    }

    #[test]
    fn from_columns_sets_row_count() {
        let table = sample();

        assert_eq!(table.rows(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["iitax", "s006"]);
    }

    #[test]
    fn insert_column_rejects_length_mismatch() {
        let mut table = sample();

        let result = table.insert_column("payrolltax", vec![1.0]);

        assert_eq!(
            result,
            Err(TableError::LengthMismatch {
                column: "payrolltax".to_string(),
                expected: 3,
                found: 1,
            })
        );
    }

    #[test]
    fn insert_column_rejects_duplicate_name() {
        let mut table = sample();

        let result = table.insert_column("iitax", vec![0.0, 0.0, 0.0]);

        assert_eq!(result, Err(TableError::DuplicateColumn("iitax".to_string())));
    }

    #[test]
    fn column_reports_missing_name() {
        let table = sample();

        assert_eq!(
            table.column("combined"),
            Err(TableError::MissingColumn("combined".to_string()))
        );
    }

    #[test]
    fn weighted_sum_multiplies_by_weight() {
        let table = sample();

        assert_eq!(table.weighted_sum("iitax").unwrap(), 100.0 - 150.0);
    }

    #[test]
    fn weighted_sum_propagates_nan() {
        let table = ResultTable::from_columns([
            (WEIGHT_COLUMN, vec![1.0, 1.0]),
            ("iitax", vec![f64::NAN, 5.0]),
        ])
        .unwrap();

        assert!(table.weighted_sum("iitax").unwrap().is_nan());
    }

    #[test]
    fn weighted_nonzero_count_skips_zero_values() {
        let table = sample();

        assert_eq!(table.weighted_nonzero_count("iitax").unwrap(), 4.0);
    }
}
