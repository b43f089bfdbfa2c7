use salvo::{Depot, Request, Response, handler, http::StatusCode, writing::Json};
use uuid::Uuid;

use crate::app::api::bookings::BookingResponse;
use crate::app::api::render_error;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::require_user;
use crate::store_handler::get_store_from_depot;
use mentora_service::BookingService;

/// ## Summary
/// POST /sessions/{id}/book - Take a seat in a session for the calling student.
///
/// ## Errors
/// Returns HTTP 401 if the caller is not identified
/// Returns HTTP 404 if the session does not exist
/// Returns HTTP 409 if the session is full, already booked by the caller, or
/// clashes with another of the caller's bookings
#[handler]
pub async fn book_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match book(req, depot).await {
        Ok(body) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(body));
        }
        Err(err) => render_error(res, &err),
    }
}

async fn book(req: &Request, depot: &Depot) -> AppResult<BookingResponse> {
    let student_id = require_user(depot)?;
    let raw = req.param::<String>("id").unwrap_or_default();
    let session_id = Uuid::parse_str(&raw)
        .map_err(|_err| AppError::BadRequest(format!("{raw:?} is not a valid session id")))?;

    let service = BookingService::new(get_store_from_depot(depot)?);
    let booking = service.book(session_id, student_id).await?;
    Ok(BookingResponse { booking })
}
