//! UTC calendar helpers shared by the loader and the heatmap builder.
//!
//! Everything here works on `NaiveDate` values that are understood to be UTC
//! calendar days. Commit timestamps are normalized to UTC before they reach
//! these functions, so no local timezone ever enters the arithmetic.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};

/// Key format used by every day-keyed map (`2024-03-01`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// The Sunday on or before `date`.
pub fn start_of_week_sun(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Midnight UTC of the day containing `ts`.
pub fn start_of_day_utc(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&ts.date_naive().and_time(NaiveTime::MIN))
}

/// Format a day as a map key.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Parse a map key back into a day. Anything that is not `YYYY-MM-DD` is `None`.
pub fn parse_day(key: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields, which would break lexicographic ordering of keys
    if key.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(key, DAY_FORMAT).ok()
}

/// UTC day of an ISO-8601 / RFC 3339 timestamp such as `2024-03-01T23:00:00Z`.
///
/// Offsets are honoured, so `2024-03-01T20:00:00-05:00` lands on 2024-03-02.
pub fn utc_day_of(timestamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// First day of the month `months` calendar months before the month of `date`.
///
/// Returns `None` only when the result would fall outside chrono's range.
pub fn first_of_month_back(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?.checked_sub_months(Months::new(months))
}

/// Full English month name (`January`).
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_week_sun() {
        // 2024-01-10 is a Wednesday
        assert_eq!(start_of_week_sun(day(2024, 1, 10)), day(2024, 1, 7));
        // A Sunday maps to itself
        assert_eq!(start_of_week_sun(day(2024, 1, 7)), day(2024, 1, 7));
        // Saturday goes back six days, across a year boundary
        assert_eq!(start_of_week_sun(day(2024, 1, 6)), day(2023, 12, 31));
        assert_eq!(start_of_week_sun(day(2024, 1, 6)).weekday(), Weekday::Sun);
    }

    #[test]
    fn test_start_of_day_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(start_of_day_utc(ts), expected);
    }

    #[test]
    fn test_day_keys() {
        assert_eq!(format_day(day(2024, 3, 1)), "2024-03-01");
        assert_eq!(parse_day("2024-03-01"), Some(day(2024, 3, 1)));
        assert_eq!(parse_day("2024-3-1x"), None);
        assert_eq!(parse_day("2024-3-1"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_utc_day_of() {
        assert_eq!(utc_day_of("2024-03-01T23:00:00Z"), Some(day(2024, 3, 1)));
        assert_eq!(utc_day_of("2024-03-01T20:00:00-05:00"), Some(day(2024, 3, 2)));
        assert_eq!(utc_day_of("not a date"), None);
    }

    #[test]
    fn test_first_of_month_back() {
        assert_eq!(first_of_month_back(day(2024, 3, 17), 0), Some(day(2024, 3, 1)));
        assert_eq!(first_of_month_back(day(2024, 3, 17), 2), Some(day(2024, 1, 1)));
        assert_eq!(first_of_month_back(day(2024, 3, 31), 13), Some(day(2023, 2, 1)));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(day(2024, 2, 29)), "February");
    }
}
