//! Recurring tutoring-session materialization.
//!
//! Expands a [`RecurrenceRule`] into concrete, individually insertable
//! [`GeneratedSession`] values. Everything here is pure: the current instant
//! is always passed in by the caller and nothing touches storage.

pub mod error;
pub mod form;
pub mod generator;
pub mod rule;
pub mod timezone;

pub use error::{ScheduleError, ScheduleResult};
pub use form::RuleForm;
pub use generator::{GeneratedSession, MAX_OCCURRENCES, SchedulePreview, generate, preview};
pub use mentora_core::types::{SessionLocation, SessionStatus};
pub use rule::{Frequency, RecurrenceMetadata, RecurrenceRule};
