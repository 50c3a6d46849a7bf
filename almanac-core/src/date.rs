//! Date helpers shared by the store, the resolver and the views.
//!
//! All dates are local calendar dates (`NaiveDate`). Storage keys are the
//! `YYYY-MM-DD` form produced by [`iso_key`].

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{AlmanacError, AlmanacResult};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Format a date as its storage key (`YYYY-MM-DD`).
pub fn iso_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` storage key.
pub fn parse_iso_key(s: &str) -> AlmanacResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AlmanacError::InvalidDate(s.to_string()))
}

/// Parse a `YYYY-MM` month reference into the first day of that month.
pub fn parse_month(s: &str) -> AlmanacResult<NaiveDate> {
    let invalid = || AlmanacError::InvalidDate(s.to_string());

    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    shift_months(start_of_month(date), 1) - Duration::days(1)
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month `delta` months away from the month of `date`.
///
/// Out-of-range results (beyond chrono's supported years) keep the current month.
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + delta;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| start_of_month(date))
}

/// Same calendar day, ignoring any time component.
pub fn is_same_day(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// First cell of a Sunday-first month grid (the Sunday on or before the 1st).
pub fn grid_start(month: NaiveDate) -> NaiveDate {
    let first = start_of_month(month);
    first - Duration::days(i64::from(first.weekday().num_days_from_sunday()))
}

/// Last cell of a Sunday-first month grid (the Saturday on or after the last day).
pub fn grid_end(month: NaiveDate) -> NaiveDate {
    let last = end_of_month(month);
    last + Duration::days(6 - i64::from(last.weekday().num_days_from_sunday()))
}

/// Every date from `from` to `to`, both inclusive.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// "January 2024"
pub fn month_title(date: NaiveDate) -> String {
    format!("{} {}", month_name(date), date.year())
}

/// "January 15, 2024"
pub fn day_title(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_key_pads_month_and_day() {
        assert_eq!(iso_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(parse_iso_key("2024-01-05").unwrap(), date(2024, 1, 5));
    }

    #[test]
    fn parse_iso_key_rejects_garbage() {
        assert!(parse_iso_key("2024-13-01").is_err());
        assert!(parse_iso_key("not a date").is_err());
    }

    #[test]
    fn parse_month_reference() {
        assert_eq!(parse_month("2025-06").unwrap(), date(2025, 6, 1));
        assert!(parse_month("2025").is_err());
        assert!(parse_month("2025-00").is_err());
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(start_of_month(date(2024, 2, 17)), date(2024, 2, 1));
        assert_eq!(end_of_month(date(2024, 2, 17)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2023, 12, 3)), date(2023, 12, 31));
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-14 is a Sunday, it belongs to the week starting Monday the 8th
        assert_eq!(start_of_week(date(2024, 1, 14)), date(2024, 1, 8));
        assert_eq!(start_of_week(date(2024, 1, 15)), date(2024, 1, 15));
        assert_eq!(start_of_week(date(2024, 1, 17)).weekday(), Weekday::Mon);
    }

    #[test]
    fn shift_months_wraps_years() {
        assert_eq!(shift_months(date(2024, 1, 31), -1), date(2023, 12, 1));
        assert_eq!(shift_months(date(2024, 12, 2), 1), date(2025, 1, 1));
        assert_eq!(shift_months(date(2024, 5, 2), 12), date(2025, 5, 1));
    }

    #[test]
    fn grid_covers_whole_weeks() {
        // March 2024 starts on a Friday and ends on a Sunday
        let start = grid_start(date(2024, 3, 10));
        let end = grid_end(date(2024, 3, 10));
        assert_eq!(start, date(2024, 2, 25));
        assert_eq!(end, date(2024, 4, 6));
        assert_eq!(days_between(start, end).count() % 7, 0);
    }

    #[test]
    fn same_day_ignores_time() {
        let a = date(2024, 3, 1).and_hms_opt(8, 0, 0).unwrap();
        let b = date(2024, 3, 1).and_hms_opt(23, 59, 0).unwrap();
        assert!(is_same_day(&a, &b));
        assert!(!is_same_day(&a, &date(2024, 3, 2)));
    }

    #[test]
    fn titles() {
        assert_eq!(month_title(date(2024, 1, 15)), "January 2024");
        assert_eq!(day_title(date(2024, 1, 15)), "January 15, 2024");
    }
}
