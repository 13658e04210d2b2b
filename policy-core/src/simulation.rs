use thiserror::Error;

use crate::models::{ReformParams, ResultTable, TableError};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("simulation has not been run")]
    NotRun,

    #[error("no results for year {0}")]
    YearNotFound(i32),

    #[error("simulation failed: {0}")]
    Failed(String),

    #[error("result table error: {0}")]
    Table(#[from] TableError),
}

/// A microsimulation that produces row-aligned base and reform results for
/// every year from `start_year` to `end_year` inclusive.
///
/// Report generation calls [`run`](Simulation::run) only when
/// [`has_run`](Simulation::has_run) is false, then reads the per-year tables.
pub trait Simulation {
    fn start_year(&self) -> i32;
    fn end_year(&self) -> i32;

    fn has_run(&self) -> bool;
    fn run(&mut self) -> Result<(), SimulationError>;

    fn base_results(&self, year: i32) -> Result<&ResultTable, SimulationError>;
    fn reform_results(&self, year: i32) -> Result<&ResultTable, SimulationError>;

    /// Parameters the reform was run with.
    fn params(&self) -> &ReformParams;

    fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year()..=self.end_year()
    }
}
