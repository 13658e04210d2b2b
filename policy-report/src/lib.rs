//! Assembles a Markdown, HTML and (optionally) PDF report from the results
//! of a tax-policy simulation.

pub mod charts;
pub mod config;
pub mod error;
pub mod html;
pub mod logging;
pub mod markdown;
pub mod pdf;
pub mod report;
pub mod template;
pub mod text;

pub use config::{ConfigError, ReportConfig};
pub use error::ReportError;
pub use pdf::{CommandPdfRenderer, PdfRenderer};
pub use report::{ReportOutput, generate_report};
pub use template::TemplateError;
