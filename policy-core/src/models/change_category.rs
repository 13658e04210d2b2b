use serde::Serialize;

/// Ordinal bucket of percentage change in after-tax income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeCategory {
    /// More than +5%.
    LargeIncrease,
    /// Above +1%, up to and including +5%.
    SmallIncrease,
    /// Between -1% and +1%, both ends included.
    Negligible,
    /// Below -1% and above -5%.
    SmallDecrease,
    /// -5% or lower.
    LargeDecrease,
}

impl ChangeCategory {
    /// Every category, largest increase first.
    pub const ALL: [ChangeCategory; 5] = [
        ChangeCategory::LargeIncrease,
        ChangeCategory::SmallIncrease,
        ChangeCategory::Negligible,
        ChangeCategory::SmallDecrease,
        ChangeCategory::LargeDecrease,
    ];

    /// Classify a percent change (e.g. `3.0` for +3%).
    ///
    /// The +5 edge belongs to [`SmallIncrease`](Self::SmallIncrease) while the
    /// -5 edge belongs to [`LargeDecrease`](Self::LargeDecrease); ±1 are
    /// [`Negligible`](Self::Negligible). Callers replace non-finite values
    /// before classifying.
    pub fn classify(pct_change: f64) -> Self {
        if pct_change > 5.0 {
            Self::LargeIncrease
        } else if pct_change > 1.0 {
            Self::SmallIncrease
        } else if pct_change >= -1.0 {
            Self::Negligible
        } else if pct_change > -5.0 {
            Self::SmallDecrease
        } else {
            Self::LargeDecrease
        }
    }

    /// Position within [`ChangeCategory::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::LargeIncrease => 0,
            Self::SmallIncrease => 1,
            Self::Negligible => 2,
            Self::SmallDecrease => 3,
            Self::LargeDecrease => 4,
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            Self::LargeIncrease => "Increase of > 5%",
            Self::SmallIncrease => "Increase 1-5%",
            Self::Negligible => "Change < 1%",
            Self::SmallDecrease => "Decrease of 1-5%",
            Self::LargeDecrease => "Decrease > 5%",
        }
    }
}
