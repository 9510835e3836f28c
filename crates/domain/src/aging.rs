use serde::{Deserialize, Serialize};

/// Receivable aging bucket derived from days past due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due.
    Current,
    /// 1 to 30 days past due.
    Days1To30,
    /// 31 to 60 days past due.
    Days31To60,
    /// 61 to 90 days past due.
    Days61To90,
    /// 91 to 180 days past due.
    Days91To180,
    /// More than 180 days past due.
    Over180,
}

impl AgingBucket {
    /// All buckets from least to most overdue.
    pub const ALL: [Self; 6] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days91To180,
        Self::Over180,
    ];

    /// Classifies a number of days past due.
    #[must_use]
    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            91..=180 => Self::Days91To180,
            _ => Self::Over180,
        }
    }

    /// Returns the stable bucket key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Days1To30 => "days_1_30",
            Self::Days31To60 => "days_31_60",
            Self::Days61To90 => "days_61_90",
            Self::Days91To180 => "days_91_180",
            Self::Over180 => "over_180",
        }
    }

    /// Returns whether the bucket counts as overdue.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        !matches!(self, Self::Current)
    }
}
