//! Expansion of a recurrence rule into concrete sessions.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::rule::{Frequency, RecurrenceMetadata, RecurrenceRule};
use crate::timezone::{convert_to_utc_lenient, local_date};
use mentora_core::constants::MAX_RECURRING_OCCURRENCES;
use mentora_core::types::{SessionLocation, SessionStatus};

/// Largest schedule a single rule may materialize.
pub const MAX_OCCURRENCES: usize = MAX_RECURRING_OCCURRENCES;

/// One bookable occurrence produced from a rule, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSession {
    pub subject: String,
    pub price: f64,
    pub location: SessionLocation,
    pub capacity: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub recurrence: RecurrenceMetadata,
}

/// What a rule would produce, without building the sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePreview {
    pub count: usize,
    pub summary: String,
    pub first_start: DateTime<Utc>,
    pub last_start: DateTime<Utc>,
}

/// ## Summary
/// Materializes every occurrence of `rule` from `reference_now` up to and
/// including `rule.end_date`.
///
/// The result is strictly increasing in `start_time`, holds at most
/// [`MAX_OCCURRENCES`] entries and never contains a start before
/// `reference_now`. Identical inputs always give identical output.
///
/// ## Errors
/// - `ScheduleError::InvalidRule` if the rule fails validation.
/// - `ScheduleError::NoOccurrences` if no occurrence fits before the end date.
/// - `ScheduleError::TooManyOccurrences` if the rule would produce more than
///   [`MAX_OCCURRENCES`] sessions. No sessions are returned in that case.
#[tracing::instrument(skip(rule), fields(subject = %rule.subject, frequency = %rule.frequency))]
pub fn generate(
    rule: &RecurrenceRule,
    reference_now: DateTime<Utc>,
) -> ScheduleResult<Vec<GeneratedSession>> {
    let starts = expand_starts(rule, reference_now)?;
    let duration = TimeDelta::minutes(i64::from(rule.duration_minutes));
    let recurrence = rule.metadata();

    let sessions: Vec<GeneratedSession> = starts
        .into_iter()
        .map(|start_time| GeneratedSession {
            subject: rule.subject.clone(),
            price: rule.price,
            location: rule.location,
            capacity: rule.capacity,
            start_time,
            end_time: start_time + duration,
            status: SessionStatus::Available,
            recurrence: recurrence.clone(),
        })
        .collect();

    tracing::debug!(count = sessions.len(), "Generated recurring sessions");
    Ok(sessions)
}

/// ## Summary
/// Counts the occurrences `generate` would produce and describes the schedule.
///
/// ## Errors
/// Same as [`generate`].
pub fn preview(
    rule: &RecurrenceRule,
    reference_now: DateTime<Utc>,
) -> ScheduleResult<SchedulePreview> {
    let starts = expand_starts(rule, reference_now)?;
    let (Some(first_start), Some(last_start)) = (starts.first(), starts.last()) else {
        return Err(ScheduleError::NoOccurrences);
    };

    Ok(SchedulePreview {
        count: starts.len(),
        summary: rule.summary(),
        first_start: *first_start,
        last_start: *last_start,
    })
}

/// Start instants of every occurrence, validated and capped.
fn expand_starts(
    rule: &RecurrenceRule,
    reference_now: DateTime<Utc>,
) -> ScheduleResult<Vec<DateTime<Utc>>> {
    rule.validate()?;

    let first = first_candidate(rule, reference_now)?;
    tracing::trace!(%first, end_date = %rule.end_date, "First candidate date");

    let mut starts = Vec::new();
    let mut candidate = Some(first);
    while let Some(date) = candidate {
        if date > rule.end_date {
            break;
        }

        starts.push(start_instant(rule, date)?);

        // Stop at the first excess occurrence; the rest is never looked at.
        if starts.len() > MAX_OCCURRENCES {
            tracing::debug!(max = MAX_OCCURRENCES, "Recurrence rule exceeds occurrence cap");
            return Err(ScheduleError::TooManyOccurrences {
                max: MAX_OCCURRENCES,
            });
        }
        candidate = next_candidate(rule.frequency, date);
    }

    if starts.is_empty() {
        return Err(ScheduleError::NoOccurrences);
    }
    Ok(starts)
}

/// First date on or after today (in the rule's zone) that falls on the rule's
/// weekday and whose start has not already passed.
fn first_candidate(
    rule: &RecurrenceRule,
    reference_now: DateTime<Utc>,
) -> ScheduleResult<NaiveDate> {
    let today = local_date(reference_now, rule.timezone);
    let target = u32::from(rule.day_of_week);
    let offset = (target + 7 - today.weekday().num_days_from_sunday()) % 7;
    let date = add_days(today, u64::from(offset))?;

    if start_instant(rule, date)? < reference_now {
        // Today's slot is already over, take next week's.
        return add_days(date, 7);
    }
    Ok(date)
}

/// Date of the occurrence following `previous`.
///
/// A monthly step lands on the same day of the next month (clamped to its
/// last day) and then moves forward to the rule's weekday.
fn next_candidate(frequency: Frequency, previous: NaiveDate) -> Option<NaiveDate> {
    match frequency {
        Frequency::Weekly => previous.checked_add_days(Days::new(7)),
        Frequency::Biweekly => previous.checked_add_days(Days::new(14)),
        Frequency::Monthly => {
            let naive = previous.checked_add_months(Months::new(1))?;
            align_to_weekday(naive, previous.weekday().num_days_from_sunday())
        }
    }
}

/// Nearest date on or after `date` whose weekday (0 = Sunday) is `target`.
fn align_to_weekday(date: NaiveDate, target: u32) -> Option<NaiveDate> {
    let offset = (target + 7 - date.weekday().num_days_from_sunday()) % 7;
    date.checked_add_days(Days::new(u64::from(offset)))
}

fn add_days(date: NaiveDate, days: u64) -> ScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ScheduleError::InvalidRule(format!("date {date} is out of range")))
}

fn start_instant(rule: &RecurrenceRule, date: NaiveDate) -> ScheduleResult<DateTime<Utc>> {
    convert_to_utc_lenient(date, rule.time, rule.timezone)
        .map_err(|err| ScheduleError::InvalidRule(err.to_string()))
}
