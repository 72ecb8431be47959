//! Period-based revenue aggregation for charts.
//!
//! A chart is a fixed number of contiguous buckets ending with the current
//! day (or month) in the viewer's time zone. Records are assigned to buckets by
//! half-open interval, `start <= created_at < end`, so an instant sitting on a
//! boundary lands in the later bucket.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{
    days_before, first_of_month, months_before, next_day, next_month, start_of_day,
};
use super::{BucketWidth, Cents, Locale, Period, ServiceRecord};

/// Revenue and service count for one slice of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Display label describing `start`
    pub label: String,
    /// Inclusive start, local midnight
    pub start: DateTime<FixedOffset>,
    /// Exclusive end, equal to the next bucket's start
    pub end: DateTime<FixedOffset>,
    pub revenue: Cents,
    pub count: i64,
}

impl RevenueBucket {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.with_timezone(&Utc) <= instant && instant < self.end.with_timezone(&Utc)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Calendar dates delimiting each bucket, oldest first.
/// Each pair is `(start, end)` with `end` exclusive.
pub fn bucket_dates(period: Period, today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let count = period.bucket_count();

    match period.bucket_width() {
        BucketWidth::Day => (0..count)
            .map(|i| {
                let start = days_before(today, (count - 1 - i) as u64);
                (start, next_day(start))
            })
            .collect(),
        BucketWidth::Month => {
            let current = first_of_month(today);
            (0..count)
                .map(|i| {
                    let start = months_before(current, (count - 1 - i) as u32);
                    (start, next_month(start))
                })
                .collect()
        }
    }
}

/// Empty buckets covering the span of `period` that ends with `now`.
pub fn empty_buckets<Tz: TimeZone>(
    period: Period,
    now: &DateTime<Tz>,
    locale: Locale,
) -> Vec<RevenueBucket> {
    let tz = now.timezone();

    bucket_dates(period, now.date_naive())
        .into_iter()
        .map(|(start, end)| RevenueBucket {
            label: locale.bucket_label(period, start),
            start: start_of_day(&tz, start).fixed_offset(),
            end: start_of_day(&tz, end).fixed_offset(),
            revenue: 0,
            count: 0,
        })
        .collect()
}

/// Group `records` into the buckets of `period` and total each one.
///
/// Always returns `period.bucket_count()` buckets in chronological order.
/// Records outside the span are ignored. The input order does not matter.
pub fn aggregate<Tz: TimeZone>(
    records: &[ServiceRecord],
    period: Period,
    now: &DateTime<Tz>,
    locale: Locale,
) -> Vec<RevenueBucket> {
    let mut buckets = empty_buckets(period, now, locale);

    for record in records {
        let at = record.created_at;
        let idx = buckets.partition_point(|b| b.end.with_timezone(&Utc) <= at);
        if let Some(bucket) = buckets.get_mut(idx).filter(|b| b.contains(at)) {
            bucket.revenue = bucket.revenue.saturating_add(record.price_cents);
            bucket.count += 1;
        }
    }

    buckets
}

/// Half-open instant range covered by `buckets`, if any.
pub fn span(
    buckets: &[RevenueBucket],
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    Some((buckets.first()?.start, buckets.last()?.end))
}
