use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{start_of_current_month, start_of_today};
use super::{average_cents, Cents, ServiceRecord};

/// Revenue and count for an open-ended window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub revenue: Cents,
    pub count: i64,
}

impl PeriodTotals {
    fn add(&mut self, record: &ServiceRecord) {
        self.revenue = self.revenue.saturating_add(record.price_cents);
        self.count += 1;
    }
}

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Every record ever logged
    pub total_services: i64,
    /// Local midnight today
    pub today_since: DateTime<FixedOffset>,
    pub today: PeriodTotals,
    /// Local midnight on the 1st of the current month
    pub month_since: DateTime<FixedOffset>,
    pub month: PeriodTotals,
    /// Month revenue over month count; 0 when nothing was logged this month
    pub average_per_service: Cents,
}

/// Compute dashboard stats as seen at `now` in its time zone.
///
/// The today and month windows have no upper bound: anything recorded at or
/// after their start counts.
pub fn summarize<Tz: TimeZone>(records: &[ServiceRecord], now: &DateTime<Tz>) -> DashboardStats {
    let today_since = start_of_today(now).with_timezone(&Utc);
    let month_since = start_of_current_month(now).with_timezone(&Utc);

    let mut today = PeriodTotals::default();
    let mut month = PeriodTotals::default();

    for record in records {
        if record.created_at >= today_since {
            today.add(record);
        }
        if record.created_at >= month_since {
            month.add(record);
        }
    }

    DashboardStats {
        total_services: records.len() as i64,
        today_since: start_of_today(now).fixed_offset(),
        today,
        month_since: start_of_current_month(now).fixed_offset(),
        month,
        average_per_service: average_cents(month.revenue, month.count),
    }
}
