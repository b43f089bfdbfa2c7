//! Seat bookings for students.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use mentora_store::SessionStore;
use mentora_store::error::StoreError;
use mentora_store::model::{Booking, BookingFilter};

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn SessionStore>,
}

impl BookingService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Takes a seat in `session_id` for `student_id`.
    ///
    /// ## Errors
    /// - `ServiceError::NotFound` if the session does not exist.
    /// - `ServiceError::Conflict` if the session is full, the student already
    ///   holds a seat in it, or the student has another booking at that time.
    #[tracing::instrument(skip(self))]
    pub async fn book(&self, session_id: Uuid, student_id: Uuid) -> ServiceResult<Booking> {
        match self.store.book(session_id, student_id).await {
            Ok(booking) => {
                tracing::info!(booking_id = %booking.id, "Session booked");
                Ok(booking)
            }
            Err(StoreError::NotFound(id)) => Err(ServiceError::NotFound(format!("session {id}"))),
            Err(StoreError::Conflict(reason)) => Err(ServiceError::Conflict(reason)),
            Err(err) => Err(err.into()),
        }
    }

    /// ## Summary
    /// Lists bookings ordered by session start.
    ///
    /// ## Errors
    /// Returns the store's error if the query fails.
    pub async fn list(&self, filter: BookingFilter) -> ServiceResult<Vec<Booking>> {
        Ok(self.store.list_bookings(filter).await?)
    }
}
