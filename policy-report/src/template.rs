//! `{{ key }}` placeholder substitution for the report template.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// The Markdown template bundled with the crate.
pub const REPORT_TEMPLATE: &str = include_str!("../assets/report_template.md");

const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no value for template placeholder '{0}'")]
    MissingKey(String),

    #[error("invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Values substituted into a template, by placeholder name.
pub type TemplateValues = HashMap<&'static str, String>;

/// Names of the placeholders in `template`, in order of appearance and
/// including repeats.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let re = Regex::new(PLACEHOLDER_PATTERN)?;
    Ok(re
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect())
}

/// Replace every `{{ key }}` in `template` with its value. Text outside the
/// placeholders is copied unchanged; unused values are ignored.
pub fn render(
    template: &str,
    values: &TemplateValues,
) -> Result<String, TemplateError> {
    let re = Regex::new(PLACEHOLDER_PATTERN)?;
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in re.captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = values
            .get(key.as_str())
            .ok_or_else(|| TemplateError::MissingKey(key.as_str().to_string()))?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}
