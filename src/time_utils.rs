// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.

use chrono::{Datelike, Days, NaiveDate};

/// Date format used by the activity tables (`YYYY-MM-DD`).
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The Sunday on or before `date`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First day of `date`'s calendar month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
    }

    fn d(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn test_week_start_from_wednesday() {
        // 2026-10-14 is a Wednesday
        assert_eq!(week_start_sunday(d("2026-10-14")), d("2026-10-11"));
    }

    #[test]
    fn test_week_start_on_sunday_is_same_day() {
        assert_eq!(week_start_sunday(d("2026-10-11")), d("2026-10-11"));
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2026-10-01 is a Thursday
        assert_eq!(week_start_sunday(d("2026-10-01")), d("2026-09-27"));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(d("2024-02-29")), d("2024-02-01"));
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_date(d("2020-01-01")), "2020-01-01");
        assert!(parse_date("2020-13-01").is_none());
    }
}
