use serde::Serialize;

/// A half-open interval `(low, high]` over baseline income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeBin {
    pub label: &'static str,
    pub low: f64,
    pub high: f64,
}

/// Income bins used for distributional reporting, highest first.
///
/// The first entry, "All", spans every income and overlaps the others. The
/// remaining eleven partition the real line. Use [`IncomeBin::display_order`]
/// to walk them bottom-to-top as they appear in tables and charts.
pub const DISTRIBUTION_BINS: [IncomeBin; 12] = [
    IncomeBin::new("All", f64::NEG_INFINITY, f64::INFINITY),
    IncomeBin::new("$1M or More", 1_000_000.0, f64::INFINITY),
    IncomeBin::new("$500K-1M", 500_000.0, 1_000_000.0),
    IncomeBin::new("$200K-500K", 200_000.0, 500_000.0),
    IncomeBin::new("$100K-200K", 100_000.0, 200_000.0),
    IncomeBin::new("$75K-100K", 75_000.0, 100_000.0),
    IncomeBin::new("$50K-75K", 50_000.0, 75_000.0),
    IncomeBin::new("$40K-50K", 40_000.0, 50_000.0),
    IncomeBin::new("$30K-40K", 30_000.0, 40_000.0),
    IncomeBin::new("$20K-30K", 20_000.0, 30_000.0),
    IncomeBin::new("$10K-20K", 10_000.0, 20_000.0),
    IncomeBin::new("Less than $10K", f64::NEG_INFINITY, 10_000.0),
];

/// Edge separating negative, zero and positive income.
const ZERO_EDGE: f64 = 1e-9;

/// Standard expanded-income bins for the difference table, lowest first and
/// "ALL" last.
///
/// Unlike [`DISTRIBUTION_BINS`] these split out negative income and a
/// zero-income point bin.
pub const STANDARD_BINS: [IncomeBin; 14] = [
    IncomeBin::new("<$0K", f64::NEG_INFINITY, -ZERO_EDGE),
    IncomeBin::new("=$0K", -ZERO_EDGE, ZERO_EDGE),
    IncomeBin::new("$0-10K", ZERO_EDGE, 10_000.0),
    IncomeBin::new("$10-20K", 10_000.0, 20_000.0),
    IncomeBin::new("$20-30K", 20_000.0, 30_000.0),
    IncomeBin::new("$30-40K", 30_000.0, 40_000.0),
    IncomeBin::new("$40-50K", 40_000.0, 50_000.0),
    IncomeBin::new("$50-75K", 50_000.0, 75_000.0),
    IncomeBin::new("$75-100K", 75_000.0, 100_000.0),
    IncomeBin::new("$100-200K", 100_000.0, 200_000.0),
    IncomeBin::new("$200-500K", 200_000.0, 500_000.0),
    IncomeBin::new("$500-1000K", 500_000.0, 1_000_000.0),
    IncomeBin::new(">$1000K", 1_000_000.0, f64::INFINITY),
    IncomeBin::new("ALL", f64::NEG_INFINITY, f64::INFINITY),
];

impl IncomeBin {
    pub const fn new(
        label: &'static str,
        low: f64,
        high: f64,
    ) -> Self {
        Self { label, low, high }
    }

    /// True when `low < income <= high`. NaN is never contained.
    pub fn contains(
        &self,
        income: f64,
    ) -> bool {
        income > self.low && income <= self.high
    }

    /// True for the "All" bin that spans every income.
    pub fn is_all(&self) -> bool {
        self.low == f64::NEG_INFINITY && self.high == f64::INFINITY
    }

    /// All twelve bins, lowest income first and "All" last.
    pub fn display_order() -> impl Iterator<Item = &'static IncomeBin> {
        DISTRIBUTION_BINS.iter().rev()
    }

    /// The eleven partition bins, lowest income first.
    pub fn partition() -> impl Iterator<Item = &'static IncomeBin> {
        Self::display_order().filter(|bin| !bin.is_all())
    }

    /// True for a bin narrower than a dollar, such as "=$0K".
    pub fn is_point(&self) -> bool {
        self.high - self.low < 1.0
    }

    /// Phrase used in narrative text, e.g. "between $10K and $20K".
    pub fn describe(&self) -> String {
        if self.is_point() {
            return format!("equal to {}", short_dollars((self.low + self.high) / 2.0));
        }
        match (self.low.is_finite(), self.high.is_finite()) {
            (false, false) => "all income levels".to_string(),
            (false, true) => format!("less than {}", short_dollars(self.high)),
            (true, false) => format!("greater than {}", short_dollars(self.low)),
            (true, true) => format!(
                "between {} and {}",
                short_dollars(self.low),
                short_dollars(self.high)
            ),
        }
    }
}

fn short_dollars(value: f64) -> String {
    // whole dollars; adding 0.0 turns -0.0 into 0.0
    let value = value.round() + 0.0;
    if value >= 1_000_000.0 && value % 1_000_000.0 == 0.0 {
        format!("${}M", value / 1_000_000.0)
    } else {
        format!("${}K", value / 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_order_runs_lowest_to_all() {
        let labels: Vec<_> = IncomeBin::display_order().map(|b| b.label).collect();

        assert_eq!(
            labels,
            vec![
                "Less than $10K",
                "$10K-20K",
                "$20K-30K",
                "$30K-40K",
                "$40K-50K",
                "$50K-75K",
                "$75K-100K",
                "$100K-200K",
                "$200K-500K",
                "$500K-1M",
                "$1M or More",
                "All",
            ]
        );
    }

    #[test]
    fn upper_edge_is_inclusive() {
        let bin = IncomeBin::new("$10K-20K", 10_000.0, 20_000.0);

        assert!(!bin.contains(10_000.0));
        assert!(bin.contains(10_000.01));
        assert!(bin.contains(20_000.0));
        assert!(!bin.contains(20_000.01));
    }

    #[test]
    fn every_finite_income_is_in_exactly_one_partition_bin() {
        let incomes = [
            -1.0e12, -5.0, 0.0, 9_999.99, 10_000.0, 10_000.5, 49_999.0, 50_000.0, 75_000.0,
            199_999.0, 500_000.0, 999_999.99, 1_000_000.0, 1_000_000.01, 7.5e9,
        ];

        for income in incomes {
            let hits = IncomeBin::partition().filter(|b| b.contains(income)).count();
            assert_eq!(hits, 1, "income {income} landed in {hits} bins");
        }
    }

    #[test]
    fn all_bin_contains_everything_finite() {
        assert!(DISTRIBUTION_BINS[0].is_all());
        assert!(DISTRIBUTION_BINS[0].contains(-3.0e20));
        assert!(DISTRIBUTION_BINS[0].contains(3.0e20));
        assert!(!DISTRIBUTION_BINS[0].contains(f64::NAN));
    }

    #[test]
    fn describe_phrases_open_and_closed_bins() {
        assert_eq!(DISTRIBUTION_BINS[11].describe(), "less than $10K");
        assert_eq!(DISTRIBUTION_BINS[10].describe(), "between $10K and $20K");
        assert_eq!(DISTRIBUTION_BINS[2].describe(), "between $500K and $1M");
        assert_eq!(DISTRIBUTION_BINS[1].describe(), "greater than $1M");
    }

    #[test]
    fn standard_bins_split_out_zero_income() {
        let hits = |income: f64| -> Vec<&str> {
            STANDARD_BINS
                .iter()
                .filter(|b| !b.is_all() && b.contains(income))
                .map(|b| b.label)
                .collect()
        };

        assert_eq!(hits(-250.0), vec!["<$0K"]);
        assert_eq!(hits(0.0), vec!["=$0K"]);
        assert_eq!(hits(1.0), vec!["$0-10K"]);
        assert_eq!(hits(10_000.0), vec!["$0-10K"]);
        assert_eq!(hits(2.0e6), vec![">$1000K"]);
        assert!(STANDARD_BINS[13].is_all());
    }

    #[test]
    fn describe_phrases_standard_bins() {
        assert_eq!(STANDARD_BINS[0].describe(), "less than $0K");
        assert_eq!(STANDARD_BINS[1].describe(), "equal to $0K");
        assert_eq!(STANDARD_BINS[2].describe(), "between $0K and $10K");
        assert_eq!(STANDARD_BINS[11].describe(), "between $500K and $1M");
        assert_eq!(STANDARD_BINS[12].describe(), "greater than $1M");
        assert_eq!(STANDARD_BINS[13].describe(), "all income levels");
    }
}
