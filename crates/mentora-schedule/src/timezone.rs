//! Wall-clock to UTC conversion for session start times.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Error during time zone conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid time zone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// ## Summary
/// Resolves an IANA time zone name such as `Africa/Cairo`.
///
/// ## Errors
/// Returns `ConversionError::UnknownTimezone` if the name is not in the tz database.
pub fn resolve_timezone(name: &str) -> Result<Tz, ConversionError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_err| ConversionError::UnknownTimezone(name.to_string()))
}

/// ## Summary
/// Returns the calendar date of `instant` as seen on a wall clock in `tz`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// ## Summary
/// Converts a local date and time in `tz` to UTC.
///
/// A time inside a DST fold resolves to its first (earlier) instant.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` if the wall-clock time falls
/// inside a DST gap.
pub fn convert_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Utc>, ConversionError> {
    let local = date.and_time(time);
    resolve_local(local, tz)
        .ok_or_else(|| ConversionError::NonExistentTime(format!("{local} in timezone {tz}")))
}

/// ## Summary
/// Converts a local date and time in `tz` to UTC, shifting times that fall
/// inside a DST gap forward by one hour.
///
/// ## Errors
/// Returns `ConversionError::NonExistentTime` if the shifted time still does
/// not exist.
pub fn convert_to_utc_lenient(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
) -> Result<DateTime<Utc>, ConversionError> {
    match convert_to_utc(date, time, tz) {
        Ok(dt) => Ok(dt),
        Err(ConversionError::NonExistentTime(_)) => {
            let shifted = date.and_time(time) + TimeDelta::hours(1);
            tracing::debug!(%date, %time, %tz, "Start time falls in a DST gap, shifting forward");
            resolve_local(shifted, tz).ok_or_else(|| {
                ConversionError::NonExistentTime(format!("{shifted} in timezone {tz}"))
            })
        }
        Err(err) => Err(err),
    }
}

fn resolve_local(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
