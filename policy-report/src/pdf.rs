//! PDF output through an external converter.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::ReportError;

/// Turns the written HTML report into a PDF.
pub trait PdfRenderer {
    /// Render `html` (styled by `css`) to `pdf`.
    fn render(
        &self,
        html: &Path,
        css: &Path,
        pdf: &Path,
    ) -> Result<(), ReportError>;
}

/// Runs a configured command line such as
/// `["weasyprint", "-s", "{css}", "{html}", "{pdf}"]`.
///
/// `{html}`, `{css}` and `{pdf}` are replaced with paths in every argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build a renderer from a configured command line. `None` when the
    /// command is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with the placeholders filled in.
    pub fn arguments(
        &self,
        html: &Path,
        css: &Path,
        pdf: &Path,
    ) -> Vec<String> {
        let html = html.display().to_string();
        let css = css.display().to_string();
        let pdf = pdf.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{html}", &html)
                    .replace("{css}", &css)
                    .replace("{pdf}", &pdf)
            })
            .collect()
    }
}

impl PdfRenderer for CommandPdfRenderer {
    fn render(
        &self,
        html: &Path,
        css: &Path,
        pdf: &Path,
    ) -> Result<(), ReportError> {
        let args = self.arguments(html, css, pdf);
        debug!(program = %self.program, ?args, "running PDF converter");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| ReportError::PdfSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ReportError::PdfCommand {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(path = %pdf.display(), "PDF written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn placeholders_are_substituted() {
        let renderer =
            CommandPdfRenderer::from_command(&command(&["weasyprint", "-s", "{css}", "{html}", "{pdf}"]))
                .unwrap();

        let args = renderer.arguments(
            Path::new("out/report.html"),
            Path::new("out/style.css"),
            Path::new("out/report.pdf"),
        );

        assert_eq!(renderer.program(), "weasyprint");
        assert_eq!(args, command(&["-s", "out/style.css", "out/report.html", "out/report.pdf"]));
    }

    #[test]
    fn placeholders_inside_arguments() {
        let renderer = CommandPdfRenderer::new("wkhtmltopdf", command(&["--input={html}"]));

        let args = renderer.arguments(Path::new("a.html"), Path::new("a.css"), Path::new("a.pdf"));

        assert_eq!(args, command(&["--input=a.html"]));
    }

    #[test]
    fn empty_command_has_no_renderer() {
        assert_eq!(CommandPdfRenderer::from_command(&[]), None);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let renderer = CommandPdfRenderer::new("/no/such/pdf-converter", Vec::new());

        let err = renderer
            .render(Path::new("a.html"), Path::new("a.css"), Path::new("a.pdf"))
            .unwrap_err();

        assert!(matches!(err, ReportError::PdfSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_a_command_error() {
        let renderer = CommandPdfRenderer::new("false", Vec::new());

        let err = renderer
            .render(Path::new("a.html"), Path::new("a.css"), Path::new("a.pdf"))
            .unwrap_err();

        assert!(matches!(err, ReportError::PdfCommand { ref program, .. } if program == "false"));
    }
}
