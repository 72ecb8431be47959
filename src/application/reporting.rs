use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::{aggregate, span, Cents, Locale, Period, RevenueBucket, ServiceRecord};

/// Revenue chart for one period, ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueChart {
    pub period: Period,
    pub generated_at: DateTime<FixedOffset>,
    pub from_date: DateTime<FixedOffset>,
    pub to_date: DateTime<FixedOffset>,
    pub buckets: Vec<RevenueBucket>,
    pub total_revenue: Cents,
    pub total_count: i64,
}

impl RevenueChart {
    pub fn build<Tz: TimeZone>(
        records: &[ServiceRecord],
        period: Period,
        now: &DateTime<Tz>,
        locale: Locale,
    ) -> Self {
        let generated_at = now.fixed_offset();
        let buckets = aggregate(records, period, now, locale);
        let (from_date, to_date) = span(&buckets).unwrap_or((generated_at, generated_at));

        Self {
            period,
            generated_at,
            from_date,
            to_date,
            total_revenue: buckets
                .iter()
                .fold(0, |total: Cents, b| total.saturating_add(b.revenue)),
            total_count: buckets.iter().map(|b| b.count).sum(),
            buckets,
        }
    }

    pub fn max_revenue(&self) -> Cents {
        self.buckets.iter().map(|b| b.revenue).max().unwrap_or(0)
    }

    /// Percentage of the chart's revenue that falls in `bucket`.
    pub fn share_of_total(&self, bucket: &RevenueBucket) -> f64 {
        if self.total_revenue == 0 {
            return 0.0;
        }
        bucket.revenue as f64 / self.total_revenue as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 20, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_totals_and_shares() {
        let records = vec![
            ServiceRecord::new("A", "Cut", 3000, now().with_timezone(&Utc)),
            ServiceRecord::new("B", "Beard", 1000, (now() - Duration::days(1)).with_timezone(&Utc)),
            ServiceRecord::new("C", "Cut", 9999, (now() - Duration::days(90)).with_timezone(&Utc)),
        ];

        let chart = RevenueChart::build(&records, Period::Week, &now(), Locale::En);

        assert_eq!(chart.total_revenue, 4000);
        assert_eq!(chart.total_count, 2);
        assert_eq!(chart.max_revenue(), 3000);
        assert_eq!(chart.from_date, chart.buckets[0].start);
        assert_eq!(chart.to_date, chart.buckets[6].end);

        let today = chart.buckets.last().unwrap();
        assert!((chart.share_of_total(today) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_chart_has_zero_shares() {
        let chart = RevenueChart::build(&[], Period::Year, &now(), Locale::Es);

        assert_eq!(chart.buckets.len(), 12);
        assert_eq!(chart.max_revenue(), 0);
        assert_eq!(chart.share_of_total(&chart.buckets[0]), 0.0);
    }

    #[test]
    fn test_total_saturates_across_buckets() {
        let big = Cents::MAX / 2 + 1;
        let records = vec![
            ServiceRecord::new("A", "Cut", big, now().with_timezone(&Utc)),
            ServiceRecord::new("B", "Cut", big, (now() - Duration::days(2)).with_timezone(&Utc)),
        ];

        let chart = RevenueChart::build(&records, Period::Week, &now(), Locale::En);

        assert_eq!(chart.total_revenue, Cents::MAX);
        assert_eq!(chart.total_count, 2);
    }
}
