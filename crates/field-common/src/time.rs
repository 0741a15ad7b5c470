//! Time handling utilities for meteorological metadata.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Reference time plus forecast offset.
///
/// Codec-backed metadata describes a field's time as the model run (base)
/// time and a forecast step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastTime {
    /// Model run/reference time
    pub base_time: DateTime<Utc>,
    /// Forecast step in hours
    pub step_hours: i64,
}

impl ForecastTime {
    pub fn new(base_time: DateTime<Utc>, step_hours: i64) -> Self {
        Self { base_time, step_hours }
    }

    /// Analysis time (step = 0)
    pub fn analysis(base_time: DateTime<Utc>) -> Self {
        Self { base_time, step_hours: 0 }
    }

    /// The actual valid time (base + step). Fails when the step takes the
    /// time outside the representable range.
    pub fn valid_datetime(&self) -> Result<DateTime<Utc>, TimeParseError> {
        Duration::try_hours(self.step_hours)
            .and_then(|step| self.base_time.checked_add_signed(step))
            .ok_or(TimeParseError::StepOutOfRange(self.step_hours))
    }

    /// Build from GRIB-style `YYYYMMDD` date and `HHMM` time integers.
    pub fn from_date_time(date: i64, time: i64, step_hours: i64) -> Result<Self, TimeParseError> {
        Ok(Self::new(parse_date_time(date, time)?, step_hours))
    }
}

/// Combine a `YYYYMMDD` date and an `HHMM` time into a UTC datetime.
pub fn parse_date_time(date: i64, time: i64) -> Result<DateTime<Utc>, TimeParseError> {
    let year = i32::try_from(date / 10_000).map_err(|_| TimeParseError::InvalidDate(date))?;
    let month = ((date / 100) % 100) as u32;
    let day = (date % 100) as u32;

    let naive_date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TimeParseError::InvalidDate(date))?;

    if !(0..=2359).contains(&time) {
        return Err(TimeParseError::InvalidTime(time));
    }
    let naive_time = NaiveTime::from_hms_opt((time / 100) as u32, (time % 100) as u32, 0)
        .ok_or(TimeParseError::InvalidTime(time))?;

    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(naive_date, naive_time)))
}

/// Format a datetime the way computed metadata keys report it.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse an ISO 8601 string (with or without timezone, or date only).
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{}T00:00:00", s), "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("invalid date: {0}")]
    InvalidDate(i64),

    #[error("invalid time: {0}")]
    InvalidTime(i64),

    #[error("invalid time format: {0}")]
    InvalidFormat(String),

    #[error("step of {0} hours is out of range")]
    StepOutOfRange(i64),
}
