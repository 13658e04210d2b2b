//! Markdown tables and lists for the report body.

use std::collections::BTreeMap;

use policy_core::analysis::{BinDifferenceTable, TaxTypeTable, WeightedTotals, YearTotals};
use policy_core::format::format_decimal;
use policy_core::{AssumptionChange, ParamValue, PolicyChange};
use rust_decimal::Decimal;

pub use policy_core::format::format_number;

/// Aggregates are reported in billions of dollars.
const BILLIONS: f64 = 1e-9;

/// Row labels for indexed parameters, keyed by index-set name.
const INDEX_LABELS: [(&str, &[&str]); 3] = [
    (
        "MARS",
        &[
            "Single",
            "Married Filing Jointly",
            "Married Filing Separately",
            "Head of Household",
            "Widow",
        ],
    ),
    (
        "idedtype",
        &[
            "Medical",
            "State & Local Taxes",
            "Real Estate Taxes",
            "Casualty",
            "Miscellaneous",
            "Interest Paid",
            "Charitable Giving",
        ],
    ),
    ("EIC", &["0 Kids", "1 Kid", "2 Kids", "3+ Kids"]),
];

fn index_label(
    vi_name: Option<&str>,
    index: usize,
) -> String {
    vi_name
        .and_then(|name| INDEX_LABELS.iter().find(|(n, _)| *n == name))
        .and_then(|(_, labels)| labels.get(index))
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("{index}"))
}

/// Render a pipe table. The first column is left aligned, the rest right
/// aligned, and every column is padded to its widest cell.
pub fn pipe_table(
    headers: &[&str],
    rows: &[Vec<String>],
) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_row(headers.iter().copied(), &widths));

    let rule: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            if i == 0 {
                format!(":{}", "-".repeat(width + 1))
            } else {
                format!("{}:", "-".repeat(width + 1))
            }
        })
        .collect();
    lines.push(format!("|{}|", rule.join("|")));

    for row in rows {
        let cells = row
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat(""))
            .take(columns);
        lines.push(table_row(cells, &widths));
    }

    lines.join("\n")
}

fn table_row<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

/// "- item" per line.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join per-year tables under bold year headings, or return `fallback`
/// when there are none.
pub fn year_tables(
    tables: &BTreeMap<i32, String>,
    fallback: &str,
) -> String {
    if tables.is_empty() {
        return fallback.to_string();
    }
    tables
        .iter()
        .map(|(year, table)| format!("**{year}**\n\n{table}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn param_rows(change: &PolicyChange) -> Vec<Vec<String>> {
    match (&change.original, &change.new) {
        (ParamValue::Indexed(original), ParamValue::Indexed(new)) => {
            let len = original.len().max(new.len());
            let cell = |values: &[Decimal], i: usize| {
                values.get(i).map(|v| format_decimal(*v)).unwrap_or_default()
            };
            (0..len)
                .map(|i| {
                    vec![
                        format!(
                            "{} - {}",
                            change.long_name,
                            index_label(change.vi_name.as_deref(), i)
                        ),
                        cell(original, i),
                        cell(new, i),
                    ]
                })
                .collect()
        }
        (original, new) => vec![vec![
            change.long_name.clone(),
            param_text(original),
            param_text(new),
        ]],
    }
}

fn param_text(value: &ParamValue) -> String {
    match value {
        ParamValue::Scalar(v) => format_decimal(*v),
        ParamValue::Indexed(values) => values
            .iter()
            .map(|v| format_decimal(*v))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// One "Policy | Original Value | New Value" table per year, ascending.
///
/// Unchanged parameters are left out, and a year with nothing left has no
/// table. Indexed values get one row per index.
pub fn policy_tables(changes: &[PolicyChange]) -> BTreeMap<i32, String> {
    let mut by_year: BTreeMap<i32, Vec<Vec<String>>> = BTreeMap::new();
    for change in changes.iter().filter(|c| !c.is_unchanged()) {
        by_year
            .entry(change.year)
            .or_default()
            .extend(param_rows(change));
    }

    by_year
        .into_iter()
        .map(|(year, rows)| (year, pipe_table(&["Policy", "Original Value", "New Value"], &rows)))
        .collect()
}

/// One table of growth or consumption assumptions per year, ascending.
/// `new_header` names the column of user-supplied values.
pub fn assumption_tables(
    changes: &[AssumptionChange],
    new_header: &str,
) -> BTreeMap<i32, String> {
    let mut by_year: BTreeMap<i32, Vec<Vec<String>>> = BTreeMap::new();
    for change in changes {
        by_year.entry(change.year).or_default().push(vec![
            change.name.clone(),
            format_decimal(change.original),
            format_decimal(change.new),
        ]);
    }

    by_year
        .into_iter()
        .map(|(year, rows)| (year, pipe_table(&["", "Default Value", new_header], &rows)))
        .collect()
}

fn billions(value: f64) -> String {
    format_number(value * BILLIONS, 2)
}

/// Base, reform and difference totals by year, in billions.
pub fn aggregate_table(totals: &WeightedTotals) -> String {
    let years: Vec<String> = totals.years.iter().map(|y| y.year.to_string()).collect();
    let mut headers: Vec<&str> = vec![""];
    headers.extend(years.iter().map(String::as_str));

    let row = |label: &str, value: fn(&YearTotals) -> f64| {
        let mut cells = vec![label.to_string()];
        cells.extend(totals.years.iter().map(|y| billions(value(y))));
        cells
    };
    let rows = vec![
        row("Base", |y| y.base),
        row("Reform", |y| y.reform),
        row("Difference", |y| y.difference),
    ];

    pipe_table(&headers, &rows)
}

/// Aggregate change by tax type and year, in billions.
pub fn tax_type_table(table: &TaxTypeTable) -> String {
    let years: Vec<String> = table.years.iter().map(i32::to_string).collect();
    let mut headers: Vec<&str> = vec![""];
    headers.extend(years.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.label.to_string()];
            cells.extend(row.values.iter().map(|v| billions(*v)));
            cells
        })
        .collect();

    pipe_table(&headers, &rows)
}

/// The income-bin table shown in the report.
///
/// Counts of units with a tax cut or increase and each bin's share of the
/// overall change are left out to keep the table narrow.
pub fn differences_table(table: &BinDifferenceTable) -> String {
    let headers = [
        "_Income Bin_",
        "All Tax Units",
        "Percent with Tax Cut",
        "Percent with Tax Increase",
        "Average Tax Change",
        "Total Tax Difference ($b)",
        "Percent Change in After-Tax Income",
    ];

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            vec![
                row.bin.label.to_string(),
                format_number(row.count, 2),
                format_number(row.pct_tax_cut(), 2),
                format_number(row.pct_tax_increase(), 2),
                format_number(row.mean_change, 2),
                billions(row.total_change),
                format_number(row.pct_aftertax_change, 2),
            ]
        })
        .collect();

    pipe_table(&headers, &rows)
}
