use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Granularity of a revenue chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last 7 days, one bucket per day
    Week,
    /// Last 30 days, one bucket per day
    Month,
    /// Last 12 months, one bucket per calendar month
    Year,
}

/// Width of a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketWidth {
    Day,
    Month,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Number of buckets in the span, the last one being the current day/month.
    pub fn bucket_count(&self) -> usize {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 12,
        }
    }

    pub fn bucket_width(&self) -> BucketWidth {
        match self {
            Period::Week | Period::Month => BucketWidth::Day,
            Period::Year => BucketWidth::Month,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" => Ok(Period::Week),
            "month" | "monthly" => Ok(Period::Month),
            "year" | "yearly" => Ok(Period::Year),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_roundtrip() {
        for period in Period::ALL {
            let parsed: Period = period.as_str().parse().unwrap();
            assert_eq!(period, parsed);
        }
    }

    #[test]
    fn test_period_aliases() {
        assert_eq!("Weekly".parse::<Period>(), Ok(Period::Week));
        assert_eq!("MONTHLY".parse::<Period>(), Ok(Period::Month));
        assert!("daily".parse::<Period>().is_err());
    }

    #[test]
    fn test_bucket_shape() {
        assert_eq!(Period::Week.bucket_count(), 7);
        assert_eq!(Period::Month.bucket_count(), 30);
        assert_eq!(Period::Year.bucket_count(), 12);
        assert_eq!(Period::Week.bucket_width(), BucketWidth::Day);
        assert_eq!(Period::Year.bucket_width(), BucketWidth::Month);
    }
}
