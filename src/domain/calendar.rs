use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};

/// The current UTC calendar date. All date attribution in the ledger is
/// calendar-day granular and UTC-based.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap()
}

/// January 1st of the year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    date.with_month(1).unwrap().with_day(1).unwrap()
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ParseDateError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ParseDateError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDateError {
    InvalidFormat,
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDateError::InvalidFormat => write!(f, "date must be in YYYY-MM-DD format"),
        }
    }
}

impl std::error::Error for ParseDateError {}
