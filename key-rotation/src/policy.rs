// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Day arithmetic shared by the password and access key checks.
//!
//! Every reference date is reduced to its calendar date before any
//! arithmetic, so the time of day never moves a boundary. `today` is always
//! passed in by the caller; the binary uses the current UTC date, which is
//! also the timezone of every IAM timestamp.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::errors::AppError;

/// A value that can be reduced to a calendar date.
pub trait CalendarDate {
    fn calendar_date(&self) -> Result<NaiveDate, AppError>;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        Ok(*self)
    }
}

impl CalendarDate for DateTime<Utc> {
    fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        Ok(self.date_naive())
    }
}

impl CalendarDate for DateTime<FixedOffset> {
    fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        Ok(self.date_naive())
    }
}

impl CalendarDate for str {
    fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        parse_calendar_date(self)
    }
}

impl CalendarDate for String {
    fn calendar_date(&self) -> Result<NaiveDate, AppError> {
        parse_calendar_date(self)
    }
}

/// Parses an RFC 3339 timestamp, a bare `YYYY-MM-DDTHH:MM:SS` timestamp or a
/// `YYYY-MM-DD` date, keeping the date as written.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(timestamp.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(value.to_string()))
}

/// Days left until `reference + window_days`, counted from `today`.
///
/// Zero means the window closes today; negative values are days since it
/// closed.
pub fn days_remaining<R>(reference: &R, window_days: i64, today: NaiveDate) -> Result<i64, AppError>
where
    R: CalendarDate + ?Sized,
{
    let start = reference.calendar_date()?;
    let window = TimeDelta::try_days(window_days)
        .ok_or_else(|| AppError::InvalidDate(format!("window of {window_days} days")))?;
    let deadline = start
        .checked_add_signed(window)
        .ok_or_else(|| AppError::InvalidDate(format!("{start} + {window_days} days")))?;

    Ok((deadline - today).num_days())
}
