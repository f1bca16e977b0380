//! Calendar-date parsing for the employment date fields.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Four-digit year, two-digit month and day, optionally followed by a time.
static ISO_DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(?:T.+)?$").expect("static pattern is valid")
});

/// Parses an ISO-8601 calendar date such as `2023-01-15`.
///
/// Month and day must be zero-padded and the year has exactly four digits
/// with no sign. A date-time (`2023-01-15T09:30:00`, optionally with `Z` or
/// a UTC offset) is accepted and truncated to the date as written.
/// Impossible dates like `2023-02-30` are rejected.
///
/// ```
/// use chrono::NaiveDate;
/// use life_event_core::dates::parse_iso_date;
///
/// assert_eq!(parse_iso_date("2023-01-15"), NaiveDate::from_ymd_opt(2023, 1, 15));
/// assert_eq!(parse_iso_date("2023-01-15T09:30:00Z"), NaiveDate::from_ymd_opt(2023, 1, 15));
/// assert_eq!(parse_iso_date("2023-1-5"), None);
/// assert_eq!(parse_iso_date("2023-02-30"), None);
/// ```
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !ISO_DATE_SHAPE.is_match(value) {
        return None;
    }

    NaiveDate::parse_from_str(value, ISO_DATE)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            ISO_DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// Equal dates count as one day. The result is zero or negative when `end`
/// precedes `start`.
pub fn inclusive_days(
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    (end - start).num_days() + 1
}

/// The current local calendar date, with no time-of-day component.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
