//! Calendar-date normalization.
//!
//! Every instant is truncated to its UTC calendar date. Request days,
//! blocked dates and "today" all go through this one rule.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;

const CANONICAL: &str = "%Y-%m-%d";

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, CANONICAL) {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole calendar days from `today` until `first_day`; negative for past days.
pub fn lead_days(first_day: NaiveDate, today: NaiveDate) -> i64 {
    (first_day - today).num_days()
}

/// `dd/mm/yyyy`, the form shown to employees.
pub fn display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_calendar_date("2025-01-10").unwrap(), day(2025, 1, 10));
        assert_eq!(parse_calendar_date(" 2025-01-10 ").unwrap(), day(2025, 1, 10));
        assert_eq!(
            parse_calendar_date("2025-01-10T08:00:00Z").unwrap(),
            day(2025, 1, 10)
        );
    }

    #[test]
    fn timestamps_truncate_in_utc() {
        // 00:30 in Rome is still the previous day in UTC.
        assert_eq!(
            parse_calendar_date("2025-01-10T00:30:00+01:00").unwrap(),
            day(2025, 1, 9)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_calendar_date("10/01/2025"),
            Err(ValidationError::InvalidDate("10/01/2025".into()))
        );
        assert!(parse_calendar_date("2025-02-30").is_err());
        assert!(parse_calendar_date("").is_err());
    }

    #[test]
    fn lead_days_counts_calendar_days() {
        let today = day(2025, 1, 3);
        assert_eq!(lead_days(day(2025, 1, 10), today), 7);
        assert_eq!(lead_days(day(2025, 1, 3), today), 0);
        assert_eq!(lead_days(day(2025, 1, 1), today), -2);
        assert_eq!(lead_days(day(2025, 3, 1), day(2025, 2, 28)), 1);
    }

    #[test]
    fn displays_day_month_year() {
        assert_eq!(display(day(2025, 1, 9)), "09/01/2025");
    }
}
