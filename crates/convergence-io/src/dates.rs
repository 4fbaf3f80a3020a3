//! Calendar-date parsing for catalog and event-log cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar date, dropping any time of day.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// and RFC 3339 timestamps (the local date of the timestamp is kept).
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_date("2021-04-07"), ymd(2021, 4, 7));
        assert_eq!(parse_date(" 2021-04-07 "), ymd(2021, 4, 7));
    }

    #[test]
    fn drops_time_of_day() {
        assert_eq!(parse_date("2021-04-07 23:59:59"), ymd(2021, 4, 7));
        assert_eq!(parse_date("2021-04-07T08:15:00.250"), ymd(2021, 4, 7));
        assert_eq!(parse_date("2021-04-07T08:15:00+02:00"), ymd(2021, 4, 7));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("07/04/2021"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2021-02-30"), None);
    }
}
