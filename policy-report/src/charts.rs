//! Standalone SVG charts embedded in the report.
//!
//! Both charts are built as strings; there is no drawing backend.

use std::fmt::Write;

use policy_core::ChangeCategory;
use policy_core::analysis::{BinDistribution, DifferencePlot, Direction};

/// Fill colours of the distribution chart, in [`ChangeCategory::ALL`] order.
pub const DISTRIBUTION_PALETTE: [&str; 5] = ["#0868ac", "#43a2ca", "#7bccc4", "#bae4bc", "#f0f9e8"];

const DIST_WIDTH: f64 = 650.0;
const DIST_HEIGHT: f64 = 400.0;
const DIFF_WIDTH: f64 = 640.0;
const DIFF_HEIGHT: f64 = 400.0;

const FONT: &str = "font-family=\"Helvetica, Arial, sans-serif\"";

/// Plot area inside the SVG canvas.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_open(
    width: f64,
    height: f64,
) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n"
    )
}

fn title(
    svg: &mut String,
    text: &str,
    x: f64,
) {
    let _ = writeln!(
        svg,
        "  <text x=\"{x}\" y=\"22\" {FONT} font-size=\"14\" font-weight=\"bold\">{}</text>",
        escape_xml(text)
    );
}

/// Dollar amount abbreviated with a magnitude suffix: `$1.25b`, `-$350.00m`.
pub fn compact_dollars(value: f64) -> String {
    if !value.is_finite() {
        return "nan".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (abs / 1e12, "t")
    } else if abs >= 1e9 {
        (abs / 1e9, "b")
    } else if abs >= 1e6 {
        (abs / 1e6, "m")
    } else if abs >= 1e3 {
        (abs / 1e3, "k")
    } else {
        (abs, "")
    };
    format!("{sign}${scaled:.2}{suffix}")
}

/// Evenly spaced "round" tick values (steps of 1, 2 or 5 × 10^n) covering
/// `[min, max]`.
pub fn nice_ticks(
    min: f64,
    max: f64,
    target: usize,
) -> Vec<f64> {
    let (min, max) = if max > min { (min, max) } else { (min - 1.0, min + 1.0) };
    let raw_step = (max - min) / target.max(1) as f64;
    let magnitude = 10f64.powi(raw_step.log10().floor() as i32);
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).floor() as i64;
    let last = (max / step).ceil() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

// ============================================================================
// Distribution chart
// ============================================================================

/// Horizontal stacked bars of the population share in each change category,
/// one bar per income bin. The first row is drawn at the bottom.
pub fn distribution_chart(
    rows: &[BinDistribution],
    year: i32,
) -> String {
    let frame = Frame {
        left: 115.0,
        top: 40.0,
        width: DIST_WIDTH - 115.0 - 150.0,
        height: DIST_HEIGHT - 40.0 - 60.0,
    };
    let mut svg = svg_open(DIST_WIDTH, DIST_HEIGHT);
    title(
        &mut svg,
        &format!("Percentage Change in After Tax Income - {year}"),
        frame.left,
    );

    // x axis: 0% to 100%
    for tick in 0..=5 {
        let share = tick as f64 / 5.0;
        let x = frame.left + share * frame.width;
        let _ = writeln!(
            svg,
            "  <line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#e5e5e5\"/>",
            frame.top,
            frame.bottom()
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{x:.1}\" y=\"{:.1}\" {FONT} font-size=\"10\" text-anchor=\"middle\">{:.0}%</text>",
            frame.bottom() + 14.0,
            share * 100.0
        );
    }

    let band = if rows.is_empty() { 0.0 } else { frame.height / rows.len() as f64 };
    let bar_height = band * 0.8;
    for (i, row) in rows.iter().enumerate() {
        let y_center = frame.bottom() - band * (i as f64 + 0.5);
        let y = y_center - bar_height / 2.0;
        let mut x = frame.left;
        for (share, colour) in row.shares.as_array().into_iter().zip(DISTRIBUTION_PALETTE) {
            let w = share * frame.width;
            if w > 0.0 {
                let _ = writeln!(
                    svg,
                    "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{bar_height:.1}\" fill=\"{colour}\"/>"
                );
            }
            x += w;
        }
        let _ = writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"{:.1}\" {FONT} font-size=\"10\" text-anchor=\"end\">{}</text>",
            frame.left - 6.0,
            y_center + 3.5,
            escape_xml(row.label)
        );
    }

    let _ = writeln!(
        svg,
        "  <text x=\"{:.1}\" y=\"{:.1}\" {FONT} font-size=\"11\" text-anchor=\"middle\">Portion of Population</text>",
        frame.left + frame.width / 2.0,
        frame.bottom() + 36.0
    );
    let y_mid = frame.top + frame.height / 2.0;
    let _ = writeln!(
        svg,
        "  <text x=\"14\" y=\"{y_mid:.1}\" {FONT} font-size=\"11\" text-anchor=\"middle\" \
         transform=\"rotate(-90 14 {y_mid:.1})\">Expanded Income Bin</text>"
    );

    // legend
    let legend_x = frame.right() + 15.0;
    for (i, (category, colour)) in ChangeCategory::ALL.iter().zip(DISTRIBUTION_PALETTE).enumerate() {
        let y = frame.top + 10.0 + i as f64 * 20.0;
        let _ = writeln!(
            svg,
            "  <rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"12\" height=\"12\" fill=\"{colour}\" stroke=\"#999\" stroke-width=\"0.5\"/>"
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"{:.1}\" {FONT} font-size=\"10\">{}</text>",
            legend_x + 18.0,
            y + 10.0,
            escape_xml(category.legend_label())
        );
    }

    svg.push_str("</svg>\n");
    svg
}

// ============================================================================
// Differences chart
// ============================================================================

fn direction_colour(direction: Direction) -> &'static str {
    match direction {
        Direction::Decrease => "red",
        Direction::Increase => "blue",
    }
}

/// Vertical bars of the aggregate change in each tax, coloured by the
/// plot's direction.
pub fn differences_chart(plot: &DifferencePlot) -> String {
    let frame = Frame {
        left: 80.0,
        top: 40.0,
        width: DIFF_WIDTH - 80.0 - 20.0,
        height: DIFF_HEIGHT - 40.0 - 40.0,
    };
    let mut svg = svg_open(DIFF_WIDTH, DIFF_HEIGHT);
    title(
        &mut svg,
        &format!("Change in Aggregate {} Tax Liability", plot.tax_type.title()),
        frame.left,
    );

    let finite = plot.bars.iter().map(|b| b.value).filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let ticks = nice_ticks(lo, hi, 5);
    let axis_min = ticks.first().copied().unwrap_or(lo);
    let axis_max = ticks.last().copied().unwrap_or(hi);
    let span = axis_max - axis_min;
    let y_of = |v: f64| frame.bottom() - (v - axis_min) / span * frame.height;

    for tick in &ticks {
        let y = y_of(*tick);
        let _ = writeln!(
            svg,
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e5e5e5\"/>",
            frame.left,
            frame.right()
        );
        let _ = writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"{:.1}\" {FONT} font-size=\"10\" text-anchor=\"end\">{}</text>",
            frame.left - 6.0,
            y + 3.5,
            compact_dollars(*tick)
        );
    }

    let zero = y_of(0.0);
    let band = if plot.bars.is_empty() { 0.0 } else { frame.width / plot.bars.len() as f64 };
    let bar_width = band * 0.7;
    for (i, bar) in plot.bars.iter().enumerate() {
        let x_center = frame.left + band * (i as f64 + 0.5);
        if bar.value.is_finite() {
            let top = y_of(bar.value).min(zero);
            let height = (y_of(bar.value) - zero).abs();
            let colour = direction_colour(bar.direction);
            let _ = writeln!(
                svg,
                "  <rect x=\"{:.1}\" y=\"{top:.1}\" width=\"{bar_width:.1}\" height=\"{height:.1}\" \
                 fill=\"{colour}\" fill-opacity=\"0.55\" stroke=\"{colour}\"/>",
                x_center - bar_width / 2.0
            );
        }
        let _ = writeln!(
            svg,
            "  <text x=\"{x_center:.1}\" y=\"{:.1}\" {FONT} font-size=\"11\" text-anchor=\"middle\">{}</text>",
            frame.bottom() + 16.0,
            escape_xml(bar.label)
        );
    }
    let _ = writeln!(
        svg,
        "  <line x1=\"{:.1}\" y1=\"{zero:.1}\" x2=\"{:.1}\" y2=\"{zero:.1}\" stroke=\"#333\"/>",
        frame.left,
        frame.right()
    );

    svg.push_str("</svg>\n");
    svg
}
