pub mod analysis;
pub mod format;
pub mod models;
pub mod simulation;

pub use analysis::AnalysisError;
pub use models::*;
pub use simulation::{Simulation, SimulationError};
