use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::report_error::{ErrCode, ReportError};

/// Wall-clock instant of a sample or reporting cycle (UTC, second precision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub timestamp: i64,
    datetime: NaiveDateTime,
}

impl Time {
    /// Returns `None` for timestamps chrono cannot represent.
    pub fn new(timestamp: i64) -> Option<Self> {
        let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0)?.naive_utc();
        Some(Self {
            timestamp,
            datetime,
        })
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now().naive_utc())
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self {
            timestamp: datetime.and_utc().timestamp(),
            datetime,
        }
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self::from_datetime(date.and_time(NaiveTime::MIN)))
    }

    pub fn from_str(time_str: &str) -> Result<Self, ReportError> {
        // Supports "YYYY-MM-DD HH:MM:SS", "YYYY-MM-DD" and "YYYYMMDD"
        let bad_time = |e: chrono::ParseError| {
            ReportError::new(
                format!("invalid time {:?}: {}", time_str, e),
                ErrCode::ConfigFormatError,
            )
        };
        let datetime = if time_str.contains(' ') {
            NaiveDateTime::parse_from_str(time_str, "%Y-%m-%d %H:%M:%S").map_err(bad_time)?
        } else if time_str.contains('-') {
            NaiveDate::parse_from_str(time_str, "%Y-%m-%d")
                .map_err(bad_time)?
                .and_time(NaiveTime::MIN)
        } else {
            NaiveDate::parse_from_str(time_str, "%Y%m%d")
                .map_err(bad_time)?
                .and_time(NaiveTime::MIN)
        };

        Ok(Self::from_datetime(datetime))
    }

    /// Day of month, 1-31.
    pub fn day(&self) -> u32 {
        self.datetime.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn to_str(&self) -> String {
        self.datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Calendar-day label used on the chart's x axis.
    pub fn to_date_str(&self) -> String {
        self.datetime.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
