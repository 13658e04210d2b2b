use std::path::PathBuf;

use policy_core::{AnalysisError, SimulationError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::template::TemplateError;

/// Errors that stop a report from being generated.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("invalid Markdown pattern: {0}")]
    Markdown(#[from] regex::Error),

    #[error("cannot start PDF converter '{program}': {source}")]
    PdfSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF converter '{program}' failed ({status}): {stderr}")]
    PdfCommand {
        program: String,
        status: String,
        stderr: String,
    },
}

impl ReportError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
