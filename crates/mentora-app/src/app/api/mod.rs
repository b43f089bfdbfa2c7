mod app_specific;
pub mod bookings;
pub mod sessions;

#[cfg(test)]
mod test_support;

use salvo::{Response, Router, writing::Json};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::identity::IdentityMiddleware;

// Re-export route constants from core
pub use mentora_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, BOOKINGS_ROUTE_COMPONENT, BOOKINGS_ROUTE_PREFIX,
    RECURRING_ROUTE_COMPONENT, RECURRING_ROUTE_PREFIX, SESSIONS_ROUTE_COMPONENT,
    SESSIONS_ROUTE_PREFIX,
};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Writes `err` as a JSON error body with its mapped status code.
pub(crate) fn render_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, %status, "Request rejected");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: err.public_message(),
    }));
}

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .hoop(IdentityMiddleware)
        .push(app_specific::routes())
        .push(sessions::routes())
        .push(bookings::routes())
}
