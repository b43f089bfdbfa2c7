//! String-typed rule submissions, as they arrive from a form.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::rule::{Frequency, RecurrenceRule};
use crate::timezone::resolve_timezone;
use mentora_core::types::SessionLocation;

/// ## Summary
/// A recurrence rule exactly as a tutor fills it in.
///
/// Numeric fields accept either JSON numbers or strings. Omitted fields fall
/// back to the form defaults: weekly on Monday at 15:00 for 120 minutes,
/// online, 10 students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleForm {
    pub subject: String,
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    pub frequency: String,
    #[serde(deserialize_with = "string_or_number")]
    pub day_of_week: String,
    pub time: String,
    #[serde(deserialize_with = "string_or_number")]
    pub duration_minutes: String,
    pub end_date: String,
    pub location: String,
    #[serde(deserialize_with = "string_or_number")]
    pub capacity: String,
    pub timezone: Option<String>,
}

impl Default for RuleForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            price: String::new(),
            frequency: "weekly".to_string(),
            day_of_week: "1".to_string(),
            time: "15:00".to_string(),
            duration_minutes: "120".to_string(),
            end_date: String::new(),
            location: "online".to_string(),
            capacity: "10".to_string(),
            timezone: None,
        }
    }
}

impl RuleForm {
    /// ## Summary
    /// Parses and validates the submission into a [`RecurrenceRule`].
    ///
    /// `default_tz` applies when the form names no time zone.
    ///
    /// ## Errors
    /// Returns `ScheduleError::InvalidRule` for a missing required field, a
    /// value that does not parse, or a rule that fails validation.
    pub fn parse(&self, default_tz: Tz) -> ScheduleResult<RecurrenceRule> {
        let subject = required("subject", &self.subject)?.to_string();
        let price = parse_number::<f64>("price", &self.price)?;
        let frequency = required("frequency", &self.frequency)?.parse::<Frequency>()?;
        let day_of_week = parse_number::<u8>("day_of_week", &self.day_of_week)?;
        let time = NaiveTime::parse_from_str(required("time", &self.time)?, "%H:%M").map_err(
            |_err| ScheduleError::InvalidRule(format!("time {:?} is not HH:MM", self.time)),
        )?;
        let duration_minutes = parse_number::<u32>("duration_minutes", &self.duration_minutes)?;
        let end_date = NaiveDate::parse_from_str(required("end_date", &self.end_date)?, "%Y-%m-%d")
            .map_err(|_err| {
                ScheduleError::InvalidRule(format!(
                    "end date {:?} is not a YYYY-MM-DD date",
                    self.end_date
                ))
            })?;
        let location = required("location", &self.location)?
            .parse::<SessionLocation>()
            .map_err(|err| ScheduleError::InvalidRule(err.to_string()))?;
        let capacity = parse_number::<u32>("capacity", &self.capacity)?;
        let timezone = match self.timezone.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                resolve_timezone(name).map_err(|err| ScheduleError::InvalidRule(err.to_string()))?
            }
            _ => default_tz,
        };

        let rule = RecurrenceRule {
            subject,
            price,
            frequency,
            day_of_week,
            time,
            duration_minutes,
            end_date,
            location,
            capacity,
            timezone,
        };
        rule.validate()?;
        Ok(rule)
    }
}

fn required<'a>(field: &str, value: &'a str) -> ScheduleResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ScheduleError::InvalidRule(format!(
            "missing required field: {field}"
        )));
    }
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> ScheduleResult<T> {
    required(field, value)?
        .parse::<T>()
        .map_err(|_err| {
            ScheduleError::InvalidRule(format!("{field} {value:?} is not a valid number"))
        })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
