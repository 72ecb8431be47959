//! Calendar arithmetic in the viewer's time zone.
//!
//! Everything here works for any `chrono::TimeZone`, so the dashboard can run on
//! `chrono::Local` while tests pin a fixed offset.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone,
};

/// First instant of `date` in `tz`.
///
/// An ambiguous midnight (clocks turned back) resolves to the earlier instant.
/// A missing midnight (clocks turned forward) resolves to the first local
/// minute that exists on that date.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => (1..=24 * 60)
            .find_map(|minutes| {
                tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                    .earliest()
            })
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight)),
    }
}

/// Local midnight of the day containing `now`.
pub fn start_of_today<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_day(&now.timezone(), now.date_naive())
}

/// Local midnight of the first day of the month containing `now`.
pub fn start_of_current_month<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    start_of_day(&now.timezone(), first_of_month(now.date_naive()))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

// The helpers below saturate at chrono's date range instead of panicking.

pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN)
}

pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_day_uses_local_midnight() {
        // UTC-5: local midnight is 05:00 UTC
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let start = start_of_day(&tz, ymd(2024, 3, 10));

        assert_eq!(
            start.with_timezone(&Utc).to_rfc3339(),
            "2024-03-10T05:00:00+00:00"
        );
    }

    #[test]
    fn test_start_of_today_and_month() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 7, 18, 15, 42, 0).unwrap();

        assert_eq!(
            start_of_today(&now).to_rfc3339(),
            "2024-07-18T00:00:00+02:00"
        );
        assert_eq!(
            start_of_current_month(&now).to_rfc3339(),
            "2024-07-01T00:00:00+02:00"
        );
    }

    #[test]
    fn test_day_arithmetic_crosses_months_and_leap_days() {
        assert_eq!(days_before(ymd(2024, 3, 1), 1), ymd(2024, 2, 29));
        assert_eq!(days_before(ymd(2024, 1, 3), 6), ymd(2023, 12, 28));
        assert_eq!(next_day(ymd(2023, 12, 31)), ymd(2024, 1, 1));
    }

    #[test]
    fn test_month_arithmetic_crosses_years() {
        assert_eq!(months_before(ymd(2024, 2, 1), 11), ymd(2023, 3, 1));
        assert_eq!(months_before(ymd(2024, 1, 1), 1), ymd(2023, 12, 1));
        assert_eq!(next_month(ymd(2023, 12, 1)), ymd(2024, 1, 1));
        assert_eq!(first_of_month(ymd(2024, 5, 31)), ymd(2024, 5, 1));
    }

    #[test]
    fn test_missing_midnight_starts_at_first_existing_minute() {
        // Chile springs forward at local midnight: 00:00 -04 becomes 01:00 -03
        let tz = chrono_tz::America::Santiago;
        assert!(tz
            .from_local_datetime(&ymd(2024, 9, 8).and_time(NaiveTime::MIN))
            .single()
            .is_none());

        let start = start_of_day(&tz, ymd(2024, 9, 8));

        assert_eq!(start.to_rfc3339(), "2024-09-08T01:00:00-03:00");
        assert_eq!(
            start_of_day(&tz, ymd(2024, 9, 7)).to_rfc3339(),
            "2024-09-07T00:00:00-04:00"
        );
    }

    #[test]
    fn test_ambiguous_midnight_uses_earliest_instant() {
        // Cuba falls back at 01:00 daylight time, so midnight happens twice
        let tz = chrono_tz::America::Havana;
        let midnight = ymd(2024, 11, 3).and_time(NaiveTime::MIN);
        assert!(matches!(
            tz.from_local_datetime(&midnight),
            LocalResult::Ambiguous(_, _)
        ));

        let start = start_of_day(&tz, ymd(2024, 11, 3));

        assert_eq!(start.to_rfc3339(), "2024-11-03T00:00:00-04:00");
        assert_eq!(
            start.with_timezone(&Utc).to_rfc3339(),
            "2024-11-03T04:00:00+00:00"
        );
    }

    #[test]
    fn test_saturates_instead_of_panicking() {
        assert_eq!(days_before(NaiveDate::MIN, 3), NaiveDate::MIN);
        assert_eq!(next_day(NaiveDate::MAX), NaiveDate::MAX);
    }
}
