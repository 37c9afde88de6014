//! Date helpers for the period picker
//!
//! All dates travel as "YYYY-MM-DD" strings.

use chrono::{Datelike, Duration, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn to_iso(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// `days` days back from `today`, both ends inclusive
pub fn last_days(today: NaiveDate, days: i64) -> (String, String) {
    (to_iso(today - Duration::days(days)), to_iso(today))
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

/// Month containing `date`, as a range
pub fn month_of(date: NaiveDate) -> Option<(String, String)> {
    month_bounds(date.year(), date.month()).map(|(start, end)| (to_iso(start), to_iso(end)))
}

/// Month before the one containing `date`
pub fn previous_month(date: NaiveDate) -> Option<(String, String)> {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    month_bounds(year, month).map(|(start, end)| (to_iso(start), to_iso(end)))
}

/// "2024-03-15" -> "03/15/2024"; anything else is returned unchanged
pub fn format_date(date_str: &str) -> String {
    match parse_iso(date_str) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => date_str.to_string(),
    }
}
