//! A [`Simulation`] whose results were written to disk by an earlier run.
//!
//! For every year in the budget window the results directory holds
//! `base_<year>.csv` and `reform_<year>.csv`, row-aligned (same records,
//! same order). "Running" the simulation reads them into memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use policy_core::{ReformParams, ResultTable, Simulation, SimulationError};
use tracing::{debug, info};

use crate::loader::ResultTableLoader;

#[derive(Debug)]
pub struct CsvSimulation {
    dir: PathBuf,
    start_year: i32,
    end_year: i32,
    params: ReformParams,
    results: BTreeMap<i32, (ResultTable, ResultTable)>,
}

impl CsvSimulation {
    pub fn new(
        dir: impl Into<PathBuf>,
        start_year: i32,
        end_year: i32,
        params: ReformParams,
    ) -> Self {
        Self {
            dir: dir.into(),
            start_year,
            end_year,
            params,
            results: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_path(
        &self,
        year: i32,
    ) -> PathBuf {
        self.dir.join(format!("base_{year}.csv"))
    }

    pub fn reform_path(
        &self,
        year: i32,
    ) -> PathBuf {
        self.dir.join(format!("reform_{year}.csv"))
    }

    /// Load the results of a single year, replacing any already loaded.
    pub fn run_year(
        &mut self,
        year: i32,
    ) -> Result<(), SimulationError> {
        let base = load(&self.base_path(year))?;
        let reform = load(&self.reform_path(year))?;
        debug!(year, rows = base.rows(), "loaded results");
        self.results.insert(year, (base, reform));
        Ok(())
    }

    fn year_results(
        &self,
        year: i32,
    ) -> Result<&(ResultTable, ResultTable), SimulationError> {
        if self.results.is_empty() {
            return Err(SimulationError::NotRun);
        }
        self.results
            .get(&year)
            .ok_or(SimulationError::YearNotFound(year))
    }
}

fn load(path: &Path) -> Result<ResultTable, SimulationError> {
    ResultTableLoader::load_file(path)
        .map_err(|e| SimulationError::Failed(format!("{}: {e}", path.display())))
}

impl Simulation for CsvSimulation {
    fn start_year(&self) -> i32 {
        self.start_year
    }

    fn end_year(&self) -> i32 {
        self.end_year
    }

    fn has_run(&self) -> bool {
        !self.results.is_empty() && self.years().all(|y| self.results.contains_key(&y))
    }

    fn run(&mut self) -> Result<(), SimulationError> {
        info!(
            dir = %self.dir.display(),
            start_year = self.start_year,
            end_year = self.end_year,
            "loading simulation results"
        );
        for year in self.start_year..=self.end_year {
            self.run_year(year)?;
        }
        Ok(())
    }

    fn base_results(
        &self,
        year: i32,
    ) -> Result<&ResultTable, SimulationError> {
        self.year_results(year).map(|(base, _)| base)
    }

    fn reform_results(
        &self,
        year: i32,
    ) -> Result<&ResultTable, SimulationError> {
        self.year_results(year).map(|(_, reform)| reform)
    }

    fn params(&self) -> &ReformParams {
        &self.params
    }
}
