// Fetch window: calendar dates -> inclusive unix-second range in local time.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

use crate::error::WindowError;

/// `[start, end]` in unix seconds, shared by every fetch of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: i64,
    pub end: i64,
}

impl FetchWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// `start 00:00:00` to `end 23:59:59`, local timezone.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        let first = start.and_time(NaiveTime::MIN);
        let last = end.and_hms_opt(23, 59, 59).unwrap_or(first);
        let start_ts = Local
            .from_local_datetime(&first)
            .earliest()
            .ok_or_else(|| WindowError::NonexistentLocalTime(first.to_string()))?;
        let end_ts = Local
            .from_local_datetime(&last)
            .latest()
            .ok_or_else(|| WindowError::NonexistentLocalTime(last.to_string()))?;
        Ok(Self::new(start_ts.timestamp(), end_ts.timestamp()))
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| WindowError::InvalidDate(s.to_string()))
}
