//! Recurring session creation on top of the schedule generator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ServiceResult;
use mentora_schedule::{RecurrenceRule, SchedulePreview, generate, preview};
use mentora_store::SessionStore;
use mentora_store::model::{NewSession, StoredSession};

/// ## Summary
/// Shared entry point for both the live preview and the actual submission of
/// a recurrence rule.
#[derive(Clone)]
pub struct RecurringSessionService {
    store: Arc<dyn SessionStore>,
}

impl RecurringSessionService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// ## Summary
    /// Describes what `create` would insert, without touching storage.
    ///
    /// ## Errors
    /// Returns the generator's error when the rule is invalid, empty or over the cap.
    pub fn preview(
        &self,
        rule: &RecurrenceRule,
        now: DateTime<Utc>,
    ) -> ServiceResult<SchedulePreview> {
        Ok(preview(rule, now)?)
    }

    /// ## Summary
    /// Materializes `rule` and inserts every occurrence for `tutor_id` in one batch.
    ///
    /// ## Side Effects
    /// Inserts session rows. A failed batch is reported as-is and never retried.
    ///
    /// ## Errors
    /// Returns the generator's error before anything is written, or the
    /// store's error if the batch insert fails.
    #[tracing::instrument(
        skip(self, rule, now),
        fields(subject = %rule.subject, frequency = %rule.frequency)
    )]
    pub async fn create(
        &self,
        tutor_id: Uuid,
        rule: &RecurrenceRule,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<StoredSession>> {
        let rows: Vec<NewSession> = generate(rule, now)?
            .into_iter()
            .map(|session| NewSession::from_generated(tutor_id, session))
            .collect();
        let requested = rows.len();

        let stored = self.store.insert_batch(rows).await.inspect_err(|err| {
            tracing::error!(error = %err, requested, "Failed to insert recurring sessions");
        })?;

        tracing::info!(count = stored.len(), "Created recurring sessions");
        Ok(stored)
    }
}
