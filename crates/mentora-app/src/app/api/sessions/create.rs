use chrono::Utc;
use salvo::{Depot, Request, Response, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use crate::app::api::render_error;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::require_user;
use crate::store_handler::get_store_from_depot;
use mentora_service::{SessionService, SingleSessionRequest};
use mentora_store::model::StoredSession;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: StoredSession,
}

/// ## Summary
/// POST /sessions - Create one bookable session for the calling tutor.
///
/// ## Errors
/// Returns HTTP 401 if the caller is not identified
/// Returns HTTP 400 if the body is malformed or incomplete
/// Returns HTTP 409 if the tutor already has a session in that slot
#[handler]
pub async fn create_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match create(req, depot).await {
        Ok(body) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(body));
        }
        Err(err) => render_error(res, &err),
    }
}

async fn create(req: &mut Request, depot: &Depot) -> AppResult<SessionResponse> {
    let tutor_id = require_user(depot)?;

    let request: SingleSessionRequest = req.parse_json().await.map_err(|e| {
        tracing::debug!(error = ?e, "Failed to parse session request");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    let service = SessionService::new(get_store_from_depot(depot)?);
    let session = service.create_single(tutor_id, &request, Utc::now()).await?;

    Ok(SessionResponse { session })
}
