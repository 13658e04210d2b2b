//! Report generation from a simulation and a configuration.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use policy_core::analysis::{
    bin_difference_table, difference_plot, differences_for_year, distribution_for_year,
    largest_tax_change, notable_changes, tax_type_table, weighted_totals,
};
use policy_core::{ReformParams, Simulation};
use tracing::{info, warn};

use crate::charts::{differences_chart, distribution_chart};
use crate::config::{ReportConfig, file_stem};
use crate::error::ReportError;
use crate::html::{DEFAULT_STYLESHEET, MarkdownRenderer, html_document};
use crate::markdown::{
    aggregate_table, assumption_tables, bullet_list, differences_table, format_number,
    policy_tables, tax_type_table as tax_type_markdown, year_tables,
};
use crate::pdf::PdfRenderer;
use crate::template::{REPORT_TEMPLATE, TemplateValues, render};
use crate::text::{
    author_line, behavioral_assumptions, form_baseline_intro, form_intro, report_date,
    revenue_direction,
};

pub const DISTRIBUTION_CHART: &str = "dist_graph.svg";
pub const DIFFERENCES_CHART: &str = "difference_graph.svg";
/// Name of the stylesheet copied next to the HTML for the PDF converter.
pub const STYLESHEET_FILE: &str = "report_style.css";

/// Variable summarized in the headline numbers, tables and charts.
const HEADLINE_VARIABLE: &str = "combined";

/// Files produced by [`generate_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutput {
    pub dir: PathBuf,
    pub markdown: PathBuf,
    pub html: PathBuf,
    pub charts: Vec<PathBuf>,
    pub pdf: Option<PathBuf>,
    /// The Markdown, HTML and chart files were removed after the PDF was
    /// written.
    pub cleaned: bool,
}

impl ReportOutput {
    /// Report files still on disk.
    pub fn files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = Vec::new();
        if !self.cleaned {
            files.push(&self.markdown);
            files.push(&self.html);
            files.extend(self.charts.iter().map(PathBuf::as_path));
        }
        files.extend(self.pdf.as_deref());
        files
    }
}

fn write_file(
    path: &Path,
    contents: &str,
) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}

/// Generate the report dated today. See [`generate_report_on`].
pub fn generate_report<S: Simulation + ?Sized>(
    simulation: &mut S,
    config: &ReportConfig,
    pdf: Option<&dyn PdfRenderer>,
) -> Result<ReportOutput, ReportError> {
    generate_report_on(simulation, config, pdf, Local::now().date_naive())
}

/// Generate the report as of `today`.
///
/// Runs the simulation first if it has not run. Charts, Markdown and HTML
/// are always written; the PDF only when a renderer is given. With `clean`
/// set, everything but the PDF is removed once the PDF exists.
pub fn generate_report_on<S: Simulation + ?Sized>(
    simulation: &mut S,
    config: &ReportConfig,
    pdf: Option<&dyn PdfRenderer>,
    today: NaiveDate,
) -> Result<ReportOutput, ReportError> {
    if !simulation.has_run() {
        info!("running simulation");
        simulation.run()?;
    }
    let simulation: &S = simulation;

    let date = report_date(today);
    let name = config.report_name(&date);
    let dir = config.output_dir(&name);
    fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
    info!(dir = %dir.display(), "writing report '{name}'");

    let mut values = narrative_values(simulation, config, &name, &date)?;

    info!("creating graphs");
    let year = simulation.start_year();
    let distribution = distribution_for_year(simulation, year)?;
    let dist_path = dir.join(DISTRIBUTION_CHART);
    write_file(&dist_path, &distribution_chart(&distribution, year))?;

    let differences = differences_for_year(simulation, year)?;
    let plot = difference_plot(&differences, HEADLINE_VARIABLE)?;
    let diff_path = dir.join(DIFFERENCES_CHART);
    write_file(&diff_path, &differences_chart(&plot))?;

    values.insert("distribution_graph", DISTRIBUTION_CHART.to_string());
    values.insert("agg_graph", DIFFERENCES_CHART.to_string());

    info!("compiling report");
    let markdown = render(REPORT_TEMPLATE, &values)?;
    let stem = file_stem(&name);
    let md_path = dir.join(format!("{stem}.md"));
    write_file(&md_path, &markdown)?;

    let css = match &config.report.css {
        Some(path) => fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?,
        None => DEFAULT_STYLESHEET.to_string(),
    };
    let body = MarkdownRenderer::new()?.render(&markdown);
    let html_path = dir.join(format!("{stem}.html"));
    write_file(&html_path, &html_document(&name, &body, &css))?;

    let mut output = ReportOutput {
        dir: dir.clone(),
        markdown: md_path,
        html: html_path,
        charts: vec![dist_path, diff_path],
        pdf: None,
        cleaned: false,
    };

    let mut copied_stylesheet = None;
    if let Some(renderer) = pdf {
        info!("converting to PDF");
        let css_path = match &config.report.css {
            Some(path) => path.clone(),
            None => {
                let path = dir.join(STYLESHEET_FILE);
                write_file(&path, DEFAULT_STYLESHEET)?;
                copied_stylesheet = Some(path.clone());
                path
            }
        };
        let pdf_path = dir.join(format!("{stem}.pdf"));
        renderer.render(&output.html, &css_path, &pdf_path)?;
        output.pdf = Some(pdf_path);
    }

    if config.report.clean {
        if output.pdf.is_some() {
            let mut intermediate = vec![output.markdown.clone(), output.html.clone()];
            intermediate.extend(output.charts.iter().cloned());
            intermediate.extend(copied_stylesheet);
            for path in &intermediate {
                fs::remove_file(path).map_err(|e| ReportError::io(path, e))?;
            }
            output.cleaned = true;
        } else {
            warn!("no PDF was written, keeping intermediate files");
        }
    }

    info!(files = output.files().len(), "report complete");
    Ok(output)
}

/// All template values except the chart file names.
fn narrative_values<S: Simulation + ?Sized>(
    simulation: &S,
    config: &ReportConfig,
    name: &str,
    date: &str,
) -> Result<TemplateValues, ReportError> {
    let params: &ReformParams = simulation.params();
    let mut values = TemplateValues::new();

    values.insert("title", name.to_string());
    values.insert("author", author_line(config.report.author.as_deref()));
    values.insert("date", date.to_string());
    values.insert("start_year", simulation.start_year().to_string());
    values.insert("end_year", simulation.end_year().to_string());

    info!("writing introduction");
    values.insert(
        "introduction",
        form_intro(&params.policy_areas(), config.report.description.as_deref()),
    );
    values.insert("baseline_intro", form_baseline_intro(params.has_base_policy(), date));

    info!("writing summary");
    let totals = weighted_totals(simulation, HEADLINE_VARIABLE)?;
    let rev_change = totals.total_difference();
    values.insert("rev_direction", revenue_direction(rev_change).to_string());
    values.insert("rev_change", format_number(rev_change.abs(), 0));

    info!("creating distribution table");
    let year = simulation.start_year();
    let bins = bin_difference_table(
        simulation.base_results(year)?,
        simulation.reform_results(year)?,
        HEADLINE_VARIABLE,
    )?;
    let (group, change) = match largest_tax_change(&bins) {
        Some(largest) => (largest.group, largest.change),
        None => ("any income group".to_string(), "remain the same".to_string()),
    };
    values.insert("largest_change_group", group);
    values.insert("largest_change_str", change);
    values.insert("differences_table", differences_table(&bins));

    info!("compiling aggregate results");
    values.insert("agg_table", aggregate_table(&totals));
    values.insert("agg_tax_type", tax_type_markdown(&tax_type_table(simulation)?));

    values.insert(
        "reform_summary",
        year_tables(&policy_tables(&params.policy), "No policy changes specified."),
    );
    let baseline = if params.has_base_policy() {
        year_tables(&policy_tables(&params.base_policy), "No baseline changes specified.")
    } else {
        format!("This report is based on current law as of {date}.")
    };
    values.insert("policy_baseline", baseline);

    info!("finding notable changes");
    let notable = notable_changes(simulation, config.report.change_threshold)?;
    values.insert("notable_changes", bullet_list(&notable));

    info!("compiling assumptions");
    values.insert("behavior_assumps", bullet_list(&behavioral_assumptions(&params.behavior)));
    values.insert(
        "consump_assumps",
        year_tables(
            &assumption_tables(&params.consumption, "User Value"),
            "No new consumption assumptions specified.",
        ),
    );
    values.insert(
        "growth_assumps",
        year_tables(
            &assumption_tables(&params.growth, "New Value"),
            "No new growth assumptions specified.",
        ),
    );
    values.insert(
        "model_versions",
        bullet_list(&[format!(
            "{}: {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )]),
    );

    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use policy_core::{ResultTable, SimulationError};

    use super::*;

    /// One-year simulation held in memory.
    struct FixedSimulation {
        base: ResultTable,
        reform: ResultTable,
        params: ReformParams,
        ran: bool,
    }

    impl FixedSimulation {
        fn new(reform_tax: [f64; 2]) -> Self {
            let table = |ati: [f64; 2], tax: [f64; 2]| {
                ResultTable::from_columns([
                    ("s006", vec![1.0, 1.0]),
                    ("aftertax_income", ati.to_vec()),
                    ("expanded_income", vec![15_000.0, 60_000.0]),
                    ("iitax", tax.to_vec()),
                    ("payrolltax", vec![100.0, 500.0]),
                    ("combined", vec![tax[0] + 100.0, tax[1] + 500.0]),
                ])
                .unwrap()
            };
            Self {
                base: table([10_000.0, 60_000.0], [1_000.0, 5_000.0]),
                reform: table([10_300.0, 57_000.0], reform_tax),
                params: ReformParams::default(),
                ran: false,
            }
        }
    }

    impl Simulation for FixedSimulation {
        fn start_year(&self) -> i32 {
            2026
        }

        fn end_year(&self) -> i32 {
            2026
        }

        fn has_run(&self) -> bool {
            self.ran
        }

        fn run(&mut self) -> Result<(), SimulationError> {
            self.ran = true;
            Ok(())
        }

        fn base_results(
            &self,
            _year: i32,
        ) -> Result<&ResultTable, SimulationError> {
            if self.ran { Ok(&self.base) } else { Err(SimulationError::NotRun) }
        }

        fn reform_results(
            &self,
            _year: i32,
        ) -> Result<&ResultTable, SimulationError> {
            if self.ran { Ok(&self.reform) } else { Err(SimulationError::NotRun) }
        }

        fn params(&self) -> &ReformParams {
            &self.params
        }
    }

    /// Records its calls and writes a placeholder PDF.
    #[derive(Default)]
    struct FakePdf {
        calls: Cell<usize>,
    }

    impl PdfRenderer for FakePdf {
        fn render(
            &self,
            html: &Path,
            css: &Path,
            pdf: &Path,
        ) -> Result<(), ReportError> {
            assert!(html.exists());
            assert!(css.exists());
            self.calls.set(self.calls.get() + 1);
            fs::write(pdf, b"%PDF-1.4").map_err(|e| ReportError::io(pdf, e))
        }
    }

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("policy-report-{label}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn config(outdir: &Path) -> ReportConfig {
        let mut config = ReportConfig::parse(
            "[report]\nname = \"Test Reform\"\nauthor = \"jane doe\"\n\n\
             [simulation]\nresults_dir = \"unused\"\nstart_year = 2026\n",
        )
        .unwrap();
        config.report.outdir = Some(outdir.to_path_buf());
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn writes_markdown_html_and_charts() {
        let dir = temp_dir("basic");
        let mut sim = FixedSimulation::new([900.0, 4_000.0]);

        let output = generate_report_on(&mut sim, &config(&dir), None, today()).unwrap();

        assert!(sim.has_run());
        assert_eq!(output.markdown, dir.join("Test-Reform.md"));
        assert_eq!(output.pdf, None);
        assert_eq!(output.files().len(), 4);
        for file in output.files() {
            assert!(file.exists(), "{}", file.display());
        }

        let md = fs::read_to_string(&output.markdown).unwrap();
        assert!(md.contains("# Test Reform"));
        assert!(md.contains("Report Prepared by Jane Doe"));
        assert!(md.contains("October 19, 2026"));
        assert!(md.contains("decrease aggregate tax liability by $1,100"));
        assert!(md.contains("between $50K and $75K"));
        assert!(md.contains("decrease by $1,000.00"));
        assert!(md.contains("This report is based on current law as of October 19, 2026."));
        assert!(md.contains("No new growth assumptions specified."));
        assert!(md.contains("- No behavioral assumptions"));
        assert!(!md.contains("{{"));

        let html = fs::read_to_string(&output.html).unwrap();
        assert!(html.contains("<article id=\"summary\">"));
        assert!(html.contains("<img alt=\"Percentage Change in After Tax Income\" src=\"dist_graph.svg\" />"));
        assert!(html.contains("<table>"));

        let svg = fs::read_to_string(dir.join(DIFFERENCES_CHART)).unwrap();
        assert!(svg.contains("fill=\"red\""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn pdf_is_rendered_and_clean_removes_intermediates() {
        let dir = temp_dir("clean");
        let mut sim = FixedSimulation::new([1_200.0, 5_000.0]);
        let mut config = config(&dir);
        config.report.clean = true;
        let pdf = FakePdf::default();

        let output = generate_report_on(&mut sim, &config, Some(&pdf), today()).unwrap();

        assert_eq!(pdf.calls.get(), 1);
        assert!(output.cleaned);
        assert_eq!(output.files(), vec![dir.join("Test-Reform.pdf").as_path()]);
        assert!(dir.join("Test-Reform.pdf").exists());
        assert!(!dir.join("Test-Reform.md").exists());
        assert!(!dir.join(DISTRIBUTION_CHART).exists());
        assert!(!dir.join(STYLESHEET_FILE).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn clean_without_pdf_keeps_files() {
        let dir = temp_dir("noclean");
        let mut sim = FixedSimulation::new([1_200.0, 5_000.0]);
        let mut config = config(&dir);
        config.report.clean = true;

        let output = generate_report_on(&mut sim, &config, None, today()).unwrap();

        assert!(!output.cleaned);
        assert!(output.markdown.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn description_replaces_generated_intro() {
        let dir = temp_dir("description");
        let mut sim = FixedSimulation::new([1_000.0, 5_000.0]);
        let mut config = config(&dir);
        config.report.description = Some("repealing the estate tax".to_string());

        let output = generate_report_on(&mut sim, &config, None, today()).unwrap();
        let md = fs::read_to_string(&output.markdown).unwrap();

        assert!(md.contains("summarizes the effects of repealing the estate tax."));
        assert!(md.contains("remain the same"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unreadable_stylesheet_is_an_error() {
        let dir = temp_dir("css");
        let mut sim = FixedSimulation::new([1_000.0, 5_000.0]);
        let mut config = config(&dir);
        config.report.css = Some(PathBuf::from("/no/such/style.css"));

        let err = generate_report_on(&mut sim, &config, None, today()).unwrap_err();

        assert!(matches!(err, ReportError::Io { ref path, .. } if path == Path::new("/no/such/style.css")));

        let _ = fs::remove_dir_all(&dir);
    }
}
