use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Booking, BookingFilter, NewSession, SessionFilter, StoredSession};
use crate::{SessionStore, StoreFuture};
use mentora_core::types::SessionStatus;

#[derive(Debug, Default)]
struct State {
    sessions: BTreeMap<Uuid, StoredSession>,
    bookings: BTreeMap<Uuid, Booking>,
}

impl State {
    fn tutor_overlaps<'a>(
        &'a self,
        tutor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a StoredSession> + 'a {
        self.sessions.values().filter(move |session| {
            session.tutor_id == tutor_id
                && session.status != SessionStatus::Cancelled
                && session.overlaps(start, end)
        })
    }
}

/// Process-local session store.
///
/// Clones share the same underlying state, so one instance can be handed to
/// every request handler.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    state: Arc<RwLock<State>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.sessions.is_empty()
    }
}

fn sorted_by_start(mut sessions: Vec<StoredSession>) -> Vec<StoredSession> {
    sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    sessions
}

impl SessionStore for InMemorySessionStore {
    #[tracing::instrument(skip(self, sessions), fields(batch_size = sessions.len()))]
    fn insert_batch(&self, sessions: Vec<NewSession>) -> StoreFuture<'_, Vec<StoredSession>> {
        Box::pin(async move {
            // Check every row before taking the write lock so a bad row
            // leaves the store untouched.
            for session in &sessions {
                session.check()?;
            }

            let created_at = Utc::now();
            let stored: Vec<StoredSession> = sessions
                .into_iter()
                .map(|session| StoredSession::new(Uuid::now_v7(), session, created_at))
                .collect();

            let mut state = self.state.write().await;
            for session in &stored {
                state.sessions.insert(session.id, session.clone());
            }
            tracing::debug!(total = state.sessions.len(), "Inserted session batch");

            Ok(stored)
        })
    }

    fn list(&self, filter: SessionFilter) -> StoreFuture<'_, Vec<StoredSession>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let sessions = state
                .sessions
                .values()
                .filter(|session| filter.matches(session))
                .cloned()
                .collect();
            Ok(sorted_by_start(sessions))
        })
    }

    fn get(&self, id: Uuid) -> StoreFuture<'_, Option<StoredSession>> {
        Box::pin(async move { Ok(self.state.read().await.sessions.get(&id).cloned()) })
    }

    fn find_overlapping(
        &self,
        tutor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<StoredSession>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let sessions = state.tutor_overlaps(tutor_id, start, end).cloned().collect();
            Ok(sorted_by_start(sessions))
        })
    }

    #[tracing::instrument(
        skip(self, session),
        fields(tutor_id = %session.tutor_id, start = %session.start_time)
    )]
    fn insert_if_free(&self, session: NewSession) -> StoreFuture<'_, StoredSession> {
        Box::pin(async move {
            session.check()?;

            let mut state = self.state.write().await;
            let clashes = state
                .tutor_overlaps(session.tutor_id, session.start_time, session.end_time)
                .count();
            if clashes > 0 {
                tracing::debug!(clashes, "Requested slot overlaps existing sessions");
                return Err(StoreError::Conflict("Time slot already booked".to_string()));
            }

            let stored = StoredSession::new(Uuid::now_v7(), session, Utc::now());
            state.sessions.insert(stored.id, stored.clone());
            Ok(stored)
        })
    }

    #[tracing::instrument(skip(self))]
    fn book(&self, id: Uuid, student_id: Uuid) -> StoreFuture<'_, Booking> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            let session = state.sessions.get(&id).ok_or(StoreError::NotFound(id))?;

            if session.booked_students.contains(&student_id) {
                return Err(StoreError::Conflict(
                    "You have already booked this session".to_string(),
                ));
            }
            if !session.status.is_bookable() || session.remaining_seats() == 0 {
                tracing::debug!(status = %session.status, "Session is not bookable");
                return Err(StoreError::Conflict(format!(
                    "session {id} is {}",
                    session.status
                )));
            }

            let (start, end) = (session.start_time, session.end_time);
            let double_booked = state
                .bookings
                .values()
                .any(|booking| booking.student_id == student_id && booking.overlaps(start, end));
            if double_booked {
                return Err(StoreError::Conflict(
                    "You already have a booking at this time".to_string(),
                ));
            }

            let session = state.sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            session.booked_students.push(student_id);
            if session.remaining_seats() == 0 {
                session.status = SessionStatus::Booked;
            }
            let booking = Booking::new(Uuid::now_v7(), session, student_id, Utc::now());
            tracing::debug!(
                remaining = session.remaining_seats(),
                booking_id = %booking.id,
                "Seat booked"
            );

            state.bookings.insert(booking.id, booking.clone());
            Ok(booking)
        })
    }

    fn list_bookings(&self, filter: BookingFilter) -> StoreFuture<'_, Vec<Booking>> {
        Box::pin(async move {
            let state = self.state.read().await;
            let mut bookings: Vec<Booking> = state
                .bookings
                .values()
                .filter(|booking| filter.matches(booking))
                .cloned()
                .collect();
            bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
            Ok(bookings)
        })
    }
}
