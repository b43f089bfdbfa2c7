use salvo::Depot;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use mentora_core::constants::USER_ID_HEADER;

/// Depot key under which the caller's user id is stored.
pub const AUTHENTICATED_USER: &str = "authenticated_user";

pub struct IdentityMiddleware;

/// ## Summary
/// Reads the caller's id from the header set by the identity proxy in front
/// of the API and stores it in the depot.
///
/// Requests without the header continue anonymously; handlers that need a
/// user reject them with [`require_user`].
///
/// ## Errors
/// Returns an HTTP 401 Unauthorized response if the header is present but is
/// not a valid UUID.
#[salvo::async_trait]
impl salvo::Handler for IdentityMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let Some(raw) = req.header::<String>(USER_ID_HEADER) else {
            tracing::trace!("No identity header, continuing anonymously");
            return;
        };

        match Uuid::parse_str(raw.trim()) {
            Ok(user_id) => {
                tracing::debug!(%user_id, "Request identified");
                depot.insert(AUTHENTICATED_USER, user_id);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting malformed identity header");
                res.status_code(salvo::http::StatusCode::UNAUTHORIZED);
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Returns the id of the identified caller.
///
/// ## Errors
/// Returns `AppError::Unauthorized` for anonymous requests.
pub fn require_user(depot: &Depot) -> AppResult<Uuid> {
    depot
        .get::<Uuid>(AUTHENTICATED_USER)
        .copied()
        .map_err(|_err| AppError::Unauthorized)
}
