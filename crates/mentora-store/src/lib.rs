//! Session storage contract and an in-memory implementation.

pub mod error;
pub mod memory;
pub mod model;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::{Booking, BookingFilter, NewSession, SessionFilter, StoredSession};

pub use memory::InMemorySessionStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Persistence collaborator for tutoring sessions.
///
/// Implementations own conflict handling: `insert_if_free` and `book` must run
/// their checks and their write as one atomic step.
pub trait SessionStore: Send + Sync {
    /// Inserts every row or none of them.
    fn insert_batch(&self, sessions: Vec<NewSession>) -> StoreFuture<'_, Vec<StoredSession>>;

    /// Sessions matching `filter`, ordered by start time.
    fn list(&self, filter: SessionFilter) -> StoreFuture<'_, Vec<StoredSession>>;

    fn get(&self, id: Uuid) -> StoreFuture<'_, Option<StoredSession>>;

    /// Sessions of `tutor_id` whose `[start, end)` interval intersects the given one.
    fn find_overlapping(
        &self,
        tutor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<StoredSession>>;

    /// Inserts `session` unless its tutor already has an overlapping session.
    fn insert_if_free(&self, session: NewSession) -> StoreFuture<'_, StoredSession>;

    /// Gives `student_id` a seat in session `id`.
    ///
    /// The session stays available until its capacity is used up.
    fn book(&self, id: Uuid, student_id: Uuid) -> StoreFuture<'_, Booking>;

    /// Bookings matching `filter`, ordered by session start.
    fn list_bookings(&self, filter: BookingFilter) -> StoreFuture<'_, Vec<Booking>>;
}
