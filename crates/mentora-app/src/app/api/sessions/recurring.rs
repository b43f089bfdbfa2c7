use chrono::Utc;
use salvo::{Depot, Request, Response, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use crate::app::api::render_error;
use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::require_user;
use crate::store_handler::get_store_from_depot;
use mentora_schedule::{RecurrenceRule, RuleForm, SchedulePreview};
use mentora_service::RecurringSessionService;
use mentora_store::model::StoredSession;

#[derive(Debug, Serialize)]
pub struct RecurringCreatedResponse {
    pub count: usize,
    pub sessions: Vec<StoredSession>,
}

/// ## Summary
/// POST /sessions/recurring/preview - Count and describe the sessions a rule
/// would create, without creating them.
///
/// ## Errors
/// Returns HTTP 400 if the rule is malformed
/// Returns HTTP 422 if the rule yields no sessions or more than the cap
#[handler]
pub async fn preview_recurring(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match preview(req, depot).await {
        Ok(body) => res.render(Json(body)),
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// POST /sessions/recurring - Materialize a rule into sessions for the
/// calling tutor.
///
/// ## Side Effects
/// Inserts every generated session in one batch.
///
/// ## Errors
/// Returns HTTP 401 if the caller is not identified
/// Returns HTTP 400 if the rule is malformed
/// Returns HTTP 422 if the rule yields no sessions or more than the cap
#[handler]
pub async fn create_recurring(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match create(req, depot).await {
        Ok(body) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(body));
        }
        Err(err) => render_error(res, &err),
    }
}

async fn preview(req: &mut Request, depot: &Depot) -> AppResult<SchedulePreview> {
    let rule = parse_rule(req, depot).await?;
    let service = RecurringSessionService::new(get_store_from_depot(depot)?);
    Ok(service.preview(&rule, Utc::now())?)
}

async fn create(req: &mut Request, depot: &Depot) -> AppResult<RecurringCreatedResponse> {
    let tutor_id = require_user(depot)?;
    let rule = parse_rule(req, depot).await?;

    let service = RecurringSessionService::new(get_store_from_depot(depot)?);
    let sessions = service.create(tutor_id, &rule, Utc::now()).await?;

    Ok(RecurringCreatedResponse {
        count: sessions.len(),
        sessions,
    })
}

async fn parse_rule(req: &mut Request, depot: &Depot) -> AppResult<RecurrenceRule> {
    let form: RuleForm = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse recurrence form");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let settings = get_config_from_depot(depot)?;
    let default_tz = settings.schedule.timezone()?;

    Ok(form.parse(default_tz)?)
}
