use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use policy_data::CsvSimulation;
use policy_report::logging::init_logging;
use policy_report::{CommandPdfRenderer, PdfRenderer, ReportConfig, generate_report};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Policy report generator.
///
/// Reads simulation results for the configured budget window and writes a
/// Markdown, HTML and (when a converter is configured) PDF report.
#[derive(Debug, Parser)]
#[command(name = "policy-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Report configuration file (TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// Directory of simulation results; overrides `simulation.results_dir`.
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// Output directory; overrides `report.outdir`.
    #[arg(short, long)]
    outdir: Option<PathBuf>,

    /// Log progress while the report is built.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Remove intermediate files once the PDF is written.
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = ReportConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration: {}", cli.config.display()))?;
    if let Some(results) = cli.results {
        config.simulation.results_dir = results;
    }
    if let Some(outdir) = cli.outdir {
        config.report.outdir = Some(outdir);
    }
    config.report.clean |= cli.clean;
    debug!(?config, "configuration loaded");

    let mut simulation = CsvSimulation::new(
        &config.simulation.results_dir,
        config.simulation.start_year,
        config.simulation.end_year(),
        config.params(),
    );

    let renderer = CommandPdfRenderer::from_command(&config.report.pdf_command);
    if renderer.is_none() {
        info!("no pdf_command configured, skipping PDF");
    }

    let output = generate_report(
        &mut simulation,
        &config,
        renderer.as_ref().map(|r| r as &dyn PdfRenderer),
    )
    .with_context(|| {
        format!(
            "Failed to generate report from: {}",
            config.simulation.results_dir.display()
        )
    })?;

    for file in output.files() {
        println!("{}", file.display());
    }

    Ok(())
}
