pub mod loader;
pub mod simulation;

pub use loader::{ResultLoaderError, ResultTableLoader};
pub use simulation::CsvSimulation;
