use thiserror::Error;

/// Outcomes of a generation call that produce no sessions.
///
/// All of these are recoverable by the caller; none of them leaves a partial
/// schedule behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("No sessions to create. Check your end date.")]
    NoOccurrences,

    #[error("Too many sessions (max {max}). Please adjust your end date.")]
    TooManyOccurrences { max: usize },
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
