use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use mentora_core::types::SessionLocation;

/// Weekday names indexed by `day_of_week` (0 = Sunday).
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// How far apart consecutive occurrences are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ScheduleError::InvalidRule(format!("unknown frequency {s:?}"))),
        }
    }
}

/// ## Summary
/// A repeating tutoring schedule, as submitted by a tutor.
///
/// The rule only lives for one generation call; what survives is the
/// [`RecurrenceMetadata`] copied onto every generated session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    pub subject: String,
    pub price: f64,
    pub frequency: Frequency,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    /// Local wall-clock start time in `timezone`.
    pub time: NaiveTime,
    pub duration_minutes: u32,
    /// Last calendar day (inclusive, in `timezone`) that may hold an occurrence.
    pub end_date: NaiveDate,
    pub location: SessionLocation,
    /// Students per session.
    pub capacity: u32,
    pub timezone: Tz,
}

/// Schedule fields of the originating rule, kept on each session for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceMetadata {
    pub frequency: Frequency,
    pub day_of_week: u8,
    /// `HH:MM`
    pub time: String,
    pub duration_minutes: u32,
    pub end_date: NaiveDate,
    pub timezone: String,
}

impl RecurrenceRule {
    /// ## Summary
    /// Checks the rule before any expansion work.
    ///
    /// ## Errors
    /// Returns `ScheduleError::InvalidRule` if the subject is blank, the price
    /// is not a positive finite amount, the duration or capacity is zero, the
    /// weekday is outside 0-6, or the time carries seconds.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.subject.trim().is_empty() {
            return Err(ScheduleError::InvalidRule("subject is required".to_string()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ScheduleError::InvalidRule(
                "price must be a positive amount".to_string(),
            ));
        }
        if self.duration_minutes == 0 {
            return Err(ScheduleError::InvalidRule(
                "duration must be at least one minute".to_string(),
            ));
        }
        if self.capacity == 0 {
            return Err(ScheduleError::InvalidRule(
                "capacity must be at least one student".to_string(),
            ));
        }
        if self.day_name().is_none() {
            return Err(ScheduleError::InvalidRule(format!(
                "day of week must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }
        if self.time.second() != 0 || self.time.nanosecond() != 0 {
            return Err(ScheduleError::InvalidRule(
                "time must be given as hours and minutes".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the rule's weekday, `None` when `day_of_week` is out of range.
    #[must_use]
    pub fn day_name(&self) -> Option<&'static str> {
        DAY_NAMES.get(usize::from(self.day_of_week)).copied()
    }

    /// ## Summary
    /// Human description of the schedule, e.g. `Every other Monday at 15:00`.
    #[must_use]
    pub fn summary(&self) -> String {
        let time = self.time.format("%H:%M");
        let day = self.day_name().unwrap_or("?");
        match self.frequency {
            Frequency::Weekly => format!("Every {day} at {time}"),
            Frequency::Biweekly => format!("Every other {day} at {time}"),
            Frequency::Monthly => format!("Monthly on {day} at {time}"),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> RecurrenceMetadata {
        RecurrenceMetadata {
            frequency: self.frequency,
            day_of_week: self.day_of_week,
            time: self.time.format("%H:%M").to_string(),
            duration_minutes: self.duration_minutes,
            end_date: self.end_date,
            timezone: self.timezone.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> RecurrenceRule {
        RecurrenceRule {
            subject: "Calculus 101".to_string(),
            price: 150.0,
            frequency: Frequency::Weekly,
            day_of_week: 1,
            time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            duration_minutes: 120,
            end_date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
            location: SessionLocation::Online,
            capacity: 10,
            timezone: Tz::UTC,
        }
    }

    #[test]
    fn valid_rule_passes() {
        assert_eq!(rule().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_subject() {
        let rule = RecurrenceRule {
            subject: "   ".to_string(),
            ..rule()
        };
        assert!(matches!(rule.validate(), Err(ScheduleError::InvalidRule(_))));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for price in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let rule = RecurrenceRule { price, ..rule() };
            assert!(
                matches!(rule.validate(), Err(ScheduleError::InvalidRule(_))),
                "price {price} should be rejected"
            );
        }
        let rule_zero_duration = RecurrenceRule {
            duration_minutes: 0,
            ..rule()
        };
        assert!(rule_zero_duration.validate().is_err());
        let rule_zero_capacity = RecurrenceRule {
            capacity: 0,
            ..rule()
        };
        assert!(rule_zero_capacity.validate().is_err());
    }

    #[test]
    fn rejects_weekday_out_of_range() {
        let rule = RecurrenceRule {
            day_of_week: 7,
            ..rule()
        };
        let err = rule.validate().unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidRule("day of week must be between 0 and 6, got 7".to_string())
        );
    }

    #[test]
    fn rejects_time_with_seconds() {
        let rule = RecurrenceRule {
            time: NaiveTime::from_hms_opt(15, 0, 30).unwrap(),
            ..rule()
        };
        assert!(rule.validate().is_err());
    }

    #[test]
    fn summary_matches_frequency() {
        assert_eq!(rule().summary(), "Every Monday at 15:00");
        let biweekly = RecurrenceRule {
            frequency: Frequency::Biweekly,
            ..rule()
        };
        assert_eq!(biweekly.summary(), "Every other Monday at 15:00");
        let monthly = RecurrenceRule {
            frequency: Frequency::Monthly,
            day_of_week: 5,
            ..rule()
        };
        assert_eq!(monthly.summary(), "Monthly on Friday at 15:00");
    }

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!("BIWEEKLY".parse::<Frequency>(), Ok(Frequency::Biweekly));
        assert!("daily".parse::<Frequency>().is_err());
    }

    #[test]
    fn metadata_serializes_schedule_fields() {
        let json = serde_json::to_value(rule().metadata()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frequency": "weekly",
                "day_of_week": 1,
                "time": "15:00",
                "duration_minutes": 120,
                "end_date": "2026-02-16",
                "timezone": "UTC",
            })
        );
    }
}
