//! CSV loader for per-record simulation results.
//!
//! ## CSV Format
//!
//! One header row naming the columns, then one row per tax unit. Column
//! order does not matter. Every cell must be a number or empty; an empty
//! cell is read as a missing value (NaN).
//!
//! | Column            | Used for |
//! |-------------------|----------|
//! | `s006`            | sampling weight |
//! | `aftertax_income` | distribution chart, after-tax income change |
//! | `expanded_income` | income bins of the difference table |
//! | `iitax`           | income tax liability |
//! | `payrolltax`      | payroll tax liability |
//! | `combined`        | income plus payroll tax |
//!
//! Any other numeric column (e.g. `c00100`) is kept and may be picked up by
//! the notable-change scan.
//!
//! ### Example
//!
//! ```csv
//! s006,aftertax_income,expanded_income,iitax,payrolltax,combined
//! 1520.5,48000,52000,3100,3978,7078
//! 980.25,9100,9400,-250,696.2,446.2
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use policy_core::{ResultTable, TableError};
use thiserror::Error;

/// Errors that can occur while loading a result table.
#[derive(Debug, Error)]
pub enum ResultLoaderError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// `row` is 1-based, not counting the header.
    #[error("invalid number '{value}' in column '{column}' on row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("result table error: {0}")]
    Table(#[from] TableError),
}

/// Reads simulation result tables from CSV.
pub struct ResultTableLoader;

impl ResultTableLoader {
    /// Parse a result table from any reader, e.g. a file or a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<ResultTable, ResultLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = idx + 1;
            for ((cell, column), name) in record.iter().zip(columns.iter_mut()).zip(&headers) {
                column.push(parse_cell(cell, name, row)?);
            }
        }

        let table = ResultTable::from_columns(headers.into_iter().zip(columns))?;
        Ok(table)
    }

    /// Open `path` and delegate to [`ResultTableLoader::parse`].
    pub fn load_file(path: &Path) -> Result<ResultTable, ResultLoaderError> {
        let file = File::open(path).map_err(|source| ResultLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file)
    }
}

fn parse_cell(
    cell: &str,
    column: &str,
    row: usize,
) -> Result<f64, ResultLoaderError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| ResultLoaderError::InvalidNumber {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        })
}
