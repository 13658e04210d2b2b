//! Narrative sentences of the report.

use chrono::NaiveDate;
use policy_core::BehaviorParams;
use policy_core::format::format_decimal;

/// Long-form date used in titles and the baseline sentence,
/// e.g. "October 19, 2026".
pub fn report_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Phrase describing what the reform does, completing
/// "This report summarizes the effects of ...".
///
/// A user description always wins. Otherwise the phrase names up to three
/// policy areas.
pub fn form_intro(
    areas: &[&str],
    description: Option<&str>,
) -> String {
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        return description.to_string();
    }

    match areas {
        [] => "modifying the tax code".to_string(),
        [a] => format!("modifying the {a} section of the tax code"),
        [a, b] => format!("modifying the {a} and {b} sections of the tax code"),
        [a, b, c] => format!("modifying the {a}, {b}, and {c} sections of the tax code"),
        [a, b, c, ..] => format!(
            "modifying a number of sections of the tax code, including {a}, {b}, and {c}"
        ),
    }
}

/// Closing sentence fragment of the introduction: the baseline is current
/// law as of `date`, possibly with modifications.
pub fn form_baseline_intro(
    has_base_policy: bool,
    date: &str,
) -> String {
    if has_base_policy {
        format!(
            "{date}, along with some modifications. A summary of these modifications \
             can be found in the \"Summary of Baseline Policy\" section"
        )
    } else {
        date.to_string()
    }
}

/// One line per behavioral elasticity, or "No behavioral assumptions".
pub fn behavioral_assumptions(behavior: &BehaviorParams) -> Vec<String> {
    let described = [
        ("Substitution elasticity of taxable income", behavior.sub),
        ("Income elasticity of taxable income", behavior.inc),
        ("Semi-elasticity of long-term capital gains", behavior.cg),
    ];

    let lines: Vec<String> = described
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {}", format_decimal(v))))
        .collect();

    if lines.is_empty() {
        vec!["No behavioral assumptions".to_string()]
    } else {
        lines
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if prev_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}

/// "Report Prepared by Jane Doe", or empty when there is no author.
pub fn author_line(author: Option<&str>) -> String {
    match author.map(str::trim).filter(|a| !a.is_empty()) {
        Some(author) => format!("Report Prepared by {}", title_case(author)),
        None => String::new(),
    }
}

/// "increase" or "decrease" for a revenue change.
pub fn revenue_direction(change: f64) -> &'static str {
    if change < 0.0 { "decrease" } else { "increase" }
}
