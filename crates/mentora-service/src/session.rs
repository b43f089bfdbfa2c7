//! One-off sessions: creation with a conflict check, listing.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use mentora_core::types::{SessionLocation, SessionStatus};
use mentora_store::SessionStore;
use mentora_store::error::StoreError;
use mentora_store::model::{NewSession, SessionFilter, StoredSession};

fn default_duration() -> u32 {
    60
}

fn default_capacity() -> u32 {
    1
}

fn default_location() -> SessionLocation {
    SessionLocation::Online
}

/// Request body for a single bookable slot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SingleSessionRequest {
    pub subject: String,
    pub price: f64,
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_location")]
    pub location: SessionLocation,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl SingleSessionRequest {
    fn validate(&self, now: DateTime<Utc>) -> ServiceResult<()> {
        if self.subject.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Missing required fields".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ServiceError::ValidationError(
                "price must be a positive amount".to_string(),
            ));
        }
        if self.duration_minutes == 0 || self.capacity == 0 {
            return Err(ServiceError::ValidationError(
                "duration and capacity must be positive".to_string(),
            ));
        }
        if self.start_time < now {
            return Err(ServiceError::ValidationError(
                "session must start in the future".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Creates one available session for `tutor_id`.
    ///
    /// ## Errors
    /// - `ServiceError::ValidationError` for an incomplete or past request.
    /// - `ServiceError::Conflict` if the tutor already has a session in that slot.
    /// - The store's error if the insert fails.
    #[tracing::instrument(
        skip(self, request, now),
        fields(subject = %request.subject, start = %request.start_time)
    )]
    pub async fn create_single(
        &self,
        tutor_id: Uuid,
        request: &SingleSessionRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<StoredSession> {
        request.validate(now)?;

        let end_time = request.start_time + TimeDelta::minutes(i64::from(request.duration_minutes));
        let row = NewSession {
            tutor_id,
            subject: request.subject.trim().to_string(),
            price: request.price,
            location: request.location,
            capacity: request.capacity,
            start_time: request.start_time,
            end_time,
            status: SessionStatus::Available,
            recurrence: None,
        };

        let session = self.store.insert_if_free(row).await.map_err(|err| match err {
            StoreError::Conflict(reason) => ServiceError::Conflict(reason),
            other => other.into(),
        })?;

        tracing::info!(session_id = %session.id, "Created session");
        Ok(session)
    }

    /// ## Summary
    /// Lists sessions ordered by start time, optionally for one tutor.
    ///
    /// ## Errors
    /// Returns the store's error if the query fails.
    pub async fn list(&self, tutor_id: Option<Uuid>) -> ServiceResult<Vec<StoredSession>> {
        Ok(self.store.list(SessionFilter { tutor_id }).await?)
    }
}
