//! Time arithmetic for todo decay.
//!
//! Dates are stored as epoch milliseconds. "Today" is always a UTC calendar
//! day and is compared at its midnight, so severities only change at day
//! boundaries.

use crate::models::todo::Severity;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Current UTC calendar day.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch milliseconds of `day` at 00:00 UTC.
pub fn day_start_millis(day: NaiveDate) -> i64 {
    day.and_time(NaiveTime::default()).and_utc().timestamp_millis()
}

/// Calendar day (UTC) containing `millis`.
pub fn date_of(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// `created + days`, or `None` when no day count is configured.
pub fn decay_date(created: i64, days: Option<u32>) -> Option<i64> {
    days.map(|d| created + i64::from(d) * MILLIS_PER_DAY)
}

/// Severity for the given decay dates on `today`.
pub fn severity(warn_date: Option<i64>, error_date: Option<i64>, today: NaiveDate) -> Severity {
    let now = day_start_millis(today);
    if error_date.is_some_and(|d| now > d) {
        Severity::Error
    } else if warn_date.is_some_and(|d| now > d) {
        Severity::Warn
    } else {
        Severity::Todo
    }
}
