use salvo::{Depot, Request, Response, handler, writing::Json};
use serde::Serialize;
use uuid::Uuid;

use crate::app::api::render_error;
use crate::error::{AppError, AppResult};
use crate::store_handler::get_store_from_depot;
use mentora_service::SessionService;
use mentora_store::model::StoredSession;

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<StoredSession>,
}

/// ## Summary
/// GET /sessions - List sessions ordered by start time.
///
/// Accepts an optional `tutor_id` query parameter.
///
/// ## Errors
/// Returns HTTP 400 if `tutor_id` is not a UUID
#[handler]
pub async fn list_sessions(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match list(req, depot).await {
        Ok(body) => res.render(Json(body)),
        Err(err) => render_error(res, &err),
    }
}

async fn list(req: &Request, depot: &Depot) -> AppResult<SessionListResponse> {
    let tutor_id = match req.query::<String>("tutor_id") {
        Some(raw) => Some(Uuid::parse_str(raw.trim()).map_err(|_err| {
            AppError::BadRequest(format!("tutor_id {raw:?} is not a valid id"))
        })?),
        None => None,
    };

    let service = SessionService::new(get_store_from_depot(depot)?);
    let sessions = service.list(tutor_id).await?;
    tracing::debug!(count = sessions.len(), "Listed sessions");

    Ok(SessionListResponse { sessions })
}
