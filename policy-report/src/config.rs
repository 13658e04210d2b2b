//! Report configuration, read from a TOML file.
//!
//! ```toml
//! [report]
//! name = "Universal Exemption Reform"
//! author = "jane doe"
//! change_threshold = 0.05
//! pdf_command = ["weasyprint", "-s", "{css}", "{html}", "{pdf}"]
//!
//! [simulation]
//! results_dir = "results"
//! start_year = 2026
//! end_year = 2028
//!
//! [[policy]]
//! name = "STD"
//! long_name = "Standard deduction amount"
//! section = "Standard Deduction"
//! vi_name = "MARS"
//! year = 2026
//! original = [15000, 30000, 15000, 22500, 30000]
//! new = [20000, 40000, 20000, 30000, 40000]
//! ```
//!
//! Relative `results_dir` and `css` paths are resolved against the directory
//! holding the configuration file. `outdir` is used as given.

use std::fs;
use std::path::{Path, PathBuf};

use policy_core::{AssumptionChange, BehaviorParams, PolicyChange, ReformParams};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CHANGE_THRESHOLD: f64 = 0.05;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The `[report]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Report title; defaults to "Policy Report-<date>".
    pub name: Option<String>,
    pub author: Option<String>,
    /// Replaces the generated description of the reform in the introduction.
    pub description: Option<String>,
    /// Fractional change in an aggregate that counts as notable.
    pub change_threshold: f64,
    pub outdir: Option<PathBuf>,
    /// Stylesheet for the HTML and PDF output; the bundled one when unset.
    pub css: Option<PathBuf>,
    /// Remove intermediate files once the PDF is written.
    pub clean: bool,
    /// Converter invocation; `{html}`, `{pdf}` and `{css}` are substituted.
    /// Empty means no PDF.
    pub pdf_command: Vec<String>,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            name: None,
            author: None,
            description: None,
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            outdir: None,
            css: None,
            clean: false,
            pdf_command: Vec::new(),
        }
    }
}

/// The `[simulation]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationSection {
    /// Directory holding `base_<year>.csv` and `reform_<year>.csv`.
    pub results_dir: PathBuf,
    pub start_year: i32,
    /// Defaults to `start_year`.
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl SimulationSection {
    pub fn end_year(&self) -> i32 {
        self.end_year.unwrap_or(self.start_year)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub report: ReportSection,
    pub simulation: SimulationSection,
    #[serde(default)]
    pub policy: Vec<PolicyChange>,
    #[serde(default)]
    pub base_policy: Vec<PolicyChange>,
    #[serde(default)]
    pub behavior: BehaviorParams,
    #[serde(default)]
    pub growth: Vec<AssumptionChange>,
    #[serde(default)]
    pub consumption: Vec<AssumptionChange>,
}

impl ReportConfig {
    /// Parse and validate a configuration held in memory.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate `path`, resolving relative input paths
    /// against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&source)?;

        if let Some(base) = path.parent() {
            config.simulation.results_dir = resolve(base, &config.simulation.results_dir);
            if let Some(css) = &config.report.css {
                config.report.css = Some(resolve(base, css));
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.end_year() < sim.start_year {
            return Err(ConfigError::Invalid(format!(
                "end_year {} is before start_year {}",
                sim.end_year(),
                sim.start_year
            )));
        }

        let threshold = self.report.change_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "change_threshold must be a non-negative number, got {threshold}"
            )));
        }

        if let Some(name) = &self.report.name {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("report name is empty".to_string()));
            }
        }

        if self.report.pdf_command.first().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid("pdf_command has an empty program".to_string()));
        }

        for change in self.policy.iter().chain(&self.base_policy) {
            if change.year > sim.end_year() {
                return Err(ConfigError::Invalid(format!(
                    "policy '{}' changes in {}, after the last simulated year {}",
                    change.name,
                    change.year,
                    sim.end_year()
                )));
            }
        }

        Ok(())
    }

    /// The reform description handed to the report text and tables.
    pub fn params(&self) -> ReformParams {
        ReformParams {
            policy: self.policy.clone(),
            base_policy: self.base_policy.clone(),
            behavior: self.behavior.clone(),
            growth: self.growth.clone(),
            consumption: self.consumption.clone(),
        }
    }

    /// The configured report name, or "Policy Report-<date>".
    pub fn report_name(
        &self,
        date: &str,
    ) -> String {
        match &self.report.name {
            Some(name) => name.clone(),
            None => format!("Policy Report-{date}"),
        }
    }

    /// The configured output directory, or the report name with spaces
    /// replaced by dashes.
    pub fn output_dir(
        &self,
        name: &str,
    ) -> PathBuf {
        self.report
            .outdir
            .clone()
            .unwrap_or_else(|| PathBuf::from(file_stem(name)))
    }
}

/// Base name of the report files for a report called `name`.
pub fn file_stem(name: &str) -> String {
    name.replace(' ', "-")
}

fn resolve(
    base: &Path,
    path: &Path,
) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use policy_core::ParamValue;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL: &str = r#"
[simulation]
results_dir = "results"
start_year = 2026
"#;

    const FULL: &str = r#"
[report]
name = "Universal Exemption Reform"
author = "jane doe"
change_threshold = 0.1
clean = true
pdf_command = ["weasyprint", "-s", "{css}", "{html}", "{pdf}"]

[simulation]
results_dir = "/data/results"
start_year = 2026
end_year = 2028

[[policy]]
name = "STD"
long_name = "Standard deduction amount"
section = "Standard Deduction"
vi_name = "MARS"
year = 2026
original = [15000, 30000, 15000, 22500, 30000]
new = [20000, 40000, 20000, 30000, 40000]

[[policy]]
name = "II_em"
long_name = "Personal exemption amount"
section = "Personal Exemptions"
year = 2027
original = 0
new = 1000.5

[behavior]
sub = 0.25

[[growth]]
name = "Wage Income Growth Rate"
year = 2026
original = 0.031
new = 0.035
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ReportConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.report, ReportSection::default());
        assert_eq!(config.report.change_threshold, 0.05);
        assert_eq!(config.simulation.end_year(), 2026);
        assert_eq!(config.params(), ReformParams::default());
    }

    #[test]
    fn full_config_is_read() {
        let config = ReportConfig::parse(FULL).unwrap();

        assert_eq!(config.report.name.as_deref(), Some("Universal Exemption Reform"));
        assert_eq!(config.report.change_threshold, 0.1);
        assert!(config.report.clean);
        assert_eq!(config.report.pdf_command.len(), 5);
        assert_eq!(config.simulation.end_year(), 2028);

        let params = config.params();
        assert_eq!(params.policy.len(), 2);
        assert_eq!(
            params.policy[0].new,
            ParamValue::Indexed(vec![dec!(20000), dec!(40000), dec!(20000), dec!(30000), dec!(40000)])
        );
        assert_eq!(params.policy[1].original, ParamValue::Scalar(dec!(0)));
        assert_eq!(params.policy[1].new, ParamValue::Scalar(dec!(1000.5)));
        assert_eq!(params.behavior.sub, Some(dec!(0.25)));
        assert_eq!(params.growth[0].new, dec!(0.035));
        assert!(params.consumption.is_empty());
    }

    #[test]
    fn default_name_and_output_dir() {
        let config = ReportConfig::parse(MINIMAL).unwrap();

        let name = config.report_name("October 19, 2026");

        assert_eq!(name, "Policy Report-October 19, 2026");
        assert_eq!(config.output_dir(&name), PathBuf::from("Policy-Report-October-19,-2026"));
    }

    #[test]
    fn configured_output_dir_wins() {
        let mut config = ReportConfig::parse(FULL).unwrap();
        config.report.outdir = Some(PathBuf::from("out"));

        assert_eq!(config.output_dir("anything"), PathBuf::from("out"));
    }

    #[test]
    fn year_range_is_checked() {
        let source = MINIMAL.replace("start_year = 2026", "start_year = 2026\nend_year = 2025");

        let err = ReportConfig::parse(&source).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("before start_year"));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let source = format!("[report]\nchange_threshold = -0.5\n{MINIMAL}");

        assert!(matches!(ReportConfig::parse(&source), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn policy_after_window_is_rejected() {
        let source = FULL.replace("year = 2027", "year = 2031");

        let err = ReportConfig::parse(&source).unwrap_err();

        assert!(err.to_string().contains("II_em"));
    }

    #[test]
    fn missing_simulation_table_is_a_parse_error() {
        let err = ReportConfig::parse("[report]\nname = \"x\"\n").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = std::env::temp_dir().join(format!("policy-report-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.toml");
        fs::write(&path, format!("[report]\ncss = \"style.css\"\n{MINIMAL}")).unwrap();

        let config = ReportConfig::load(&path).unwrap();

        assert_eq!(config.simulation.results_dir, dir.join("results"));
        assert_eq!(config.report.css, Some(dir.join("style.css")));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ReportConfig::load(Path::new("/no/such/report.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
