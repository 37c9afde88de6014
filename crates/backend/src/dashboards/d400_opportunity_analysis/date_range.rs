use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use contracts::dashboards::d400_opportunity_analysis::{OpportunityAnalysisRequest, DATE_FORMAT};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DateRangeError {
    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

/// Inclusive calendar period
///
/// `start <= end` is not enforced: an inverted range simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Missing `date_to` is today, missing `date_from` is `default_days` before `date_to`
    pub fn from_request(
        request: &OpportunityAnalysisRequest,
        today: NaiveDate,
        default_days: i64,
    ) -> Result<Self, DateRangeError> {
        let end = match non_empty(request.date_to.as_deref()) {
            Some(value) => parse_date("date_to", value)?,
            None => today,
        };
        let start = match non_empty(request.date_from.as_deref()) {
            Some(value) => parse_date("date_from", value)?,
            None => end - Duration::days(default_days),
        };
        Ok(Self::new(start, end))
    }

    /// `start` at 00:00:00 UTC
    pub fn start_bound(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::default()).and_utc()
    }

    /// `end` at 23:59:59 UTC
    pub fn end_bound(&self) -> DateTime<Utc> {
        (self.end.and_time(NaiveTime::default()) + Duration::seconds(86_399)).and_utc()
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn date_from(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn date_to(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.date_from(), self.date_to())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DateRangeError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
