use salvo::{Depot, Request, Response, handler, writing::Json};
use serde::Serialize;
use uuid::Uuid;

use crate::app::api::render_error;
use crate::error::{AppError, AppResult};
use crate::middleware::identity::require_user;
use crate::store_handler::get_store_from_depot;
use mentora_service::BookingService;
use mentora_store::model::{Booking, BookingFilter};

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

/// ## Summary
/// GET /bookings - List bookings ordered by session start.
///
/// Accepts optional `student_id` and `tutor_id` query parameters. Without
/// either, the caller's own bookings as a student are listed.
///
/// ## Errors
/// Returns HTTP 401 if the caller is not identified
/// Returns HTTP 400 if an id parameter is not a UUID
#[handler]
pub async fn list_bookings(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match list(req, depot).await {
        Ok(body) => res.render(Json(body)),
        Err(err) => render_error(res, &err),
    }
}

fn query_id(req: &Request, name: &str) -> AppResult<Option<Uuid>> {
    req.query::<String>(name)
        .map(|raw| {
            Uuid::parse_str(raw.trim())
                .map_err(|_err| AppError::BadRequest(format!("{name} {raw:?} is not a valid id")))
        })
        .transpose()
}

async fn list(req: &Request, depot: &Depot) -> AppResult<BookingListResponse> {
    let caller = require_user(depot)?;
    let mut filter = BookingFilter {
        student_id: query_id(req, "student_id")?,
        tutor_id: query_id(req, "tutor_id")?,
    };
    if filter == BookingFilter::default() {
        filter.student_id = Some(caller);
    }

    let service = BookingService::new(get_store_from_depot(depot)?);
    let bookings = service.list(filter).await?;
    tracing::debug!(count = bookings.len(), "Listed bookings");
    Ok(BookingListResponse { bookings })
}
