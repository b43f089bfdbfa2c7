// Booking API handlers.

use salvo::Router;
use serde::Serialize;

use crate::app::api::BOOKINGS_ROUTE_COMPONENT;
use mentora_store::model::Booking;

mod list;


#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(BOOKINGS_ROUTE_COMPONENT).get(list::list_bookings)
}
