use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use mentora_core::types::{SessionLocation, SessionStatus};
use mentora_schedule::{GeneratedSession, RecurrenceMetadata};

/// Insert payload for one session row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub tutor_id: Uuid,
    pub subject: String,
    pub price: f64,
    pub location: SessionLocation,
    pub capacity: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub recurrence: Option<RecurrenceMetadata>,
}

impl NewSession {
    /// Row for one materialized occurrence of a recurrence rule.
    #[must_use]
    pub fn from_generated(tutor_id: Uuid, session: GeneratedSession) -> Self {
        Self {
            tutor_id,
            subject: session.subject,
            price: session.price,
            location: session.location,
            capacity: session.capacity,
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status,
            recurrence: Some(session.recurrence),
        }
    }

    /// ## Summary
    /// Checks the row-level constraints a store enforces on insert.
    ///
    /// ## Errors
    /// Returns `StoreError::InvalidRecord` if the interval is empty, or the
    /// price or capacity is not positive.
    pub fn check(&self) -> StoreResult<()> {
        if self.end_time <= self.start_time {
            return Err(StoreError::InvalidRecord(format!(
                "session ends at {} before it starts at {}",
                self.end_time, self.start_time
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(StoreError::InvalidRecord("price must be positive".to_string()));
        }
        if self.capacity == 0 {
            return Err(StoreError::InvalidRecord(
                "capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A persisted session row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub subject: String,
    pub price: f64,
    pub location: SessionLocation,
    pub capacity: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub recurrence: Option<RecurrenceMetadata>,
    /// Students holding a seat, in booking order.
    pub booked_students: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    #[must_use]
    pub fn new(id: Uuid, session: NewSession, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            tutor_id: session.tutor_id,
            subject: session.subject,
            price: session.price,
            location: session.location,
            capacity: session.capacity,
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status,
            recurrence: session.recurrence,
            booked_students: Vec::new(),
            created_at,
        }
    }

    /// Seats still open.
    #[must_use]
    pub fn remaining_seats(&self) -> u32 {
        let taken = u32::try_from(self.booked_students.len()).unwrap_or(u32::MAX);
        self.capacity.saturating_sub(taken)
    }

    /// Whether `[start, end)` intersects this session's interval.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFilter {
    pub tutor_id: Option<Uuid>,
}

impl SessionFilter {
    #[must_use]
    pub fn matches(&self, session: &StoredSession) -> bool {
        self.tutor_id.is_none_or(|tutor_id| session.tutor_id == tutor_id)
    }
}

/// A student's seat in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub subject: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    #[must_use]
    pub fn new(
        id: Uuid,
        session: &StoredSession,
        student_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id: session.id,
            student_id,
            tutor_id: session.tutor_id,
            subject: session.subject.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            created_at,
        }
    }

    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Booking listing filter; both ids must match when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    pub student_id: Option<Uuid>,
    pub tutor_id: Option<Uuid>,
}

impl BookingFilter {
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.student_id.is_none_or(|id| booking.student_id == id)
            && self.tutor_id.is_none_or(|id| booking.tutor_id == id)
    }
}
