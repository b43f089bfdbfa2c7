use salvo::http::StatusCode;
use thiserror::Error;

use mentora_schedule::ScheduleError;
use mentora_service::error::ServiceError;
use mentora_store::error::StoreError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    ScheduleError(#[from] ScheduleError),

    #[error(transparent)]
    CoreError(#[from] mentora_core::error::CoreError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ScheduleError(err) | Self::ServiceError(ServiceError::ScheduleError(err)) => {
                schedule_status(err)
            }
            Self::ServiceError(err) => match err {
                ServiceError::ValidationError(_)
                | ServiceError::StoreError(StoreError::InvalidRecord(_)) => StatusCode::BAD_REQUEST,
                ServiceError::Conflict(_) | ServiceError::StoreError(StoreError::Conflict(_)) => {
                    StatusCode::CONFLICT
                }
                ServiceError::NotFound(_) | ServiceError::StoreError(StoreError::NotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::ScheduleError(err) => schedule_status(err),
                ServiceError::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to API clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

fn schedule_status(err: &ScheduleError) -> StatusCode {
    match err {
        ScheduleError::InvalidRule(_) => StatusCode::BAD_REQUEST,
        ScheduleError::NoOccurrences | ScheduleError::TooManyOccurrences { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_core::error::CoreError;

    #[test]
    fn generation_outcomes_map_to_client_errors() {
        let invalid: AppError = ScheduleError::InvalidRule("bad".to_string()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let empty: AppError = ServiceError::from(ScheduleError::NoOccurrences).into();
        assert_eq!(empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            empty.public_message(),
            "No sessions to create. Check your end date."
        );

        let too_many: AppError =
            ServiceError::from(ScheduleError::TooManyOccurrences { max: 52 }).into();
        assert_eq!(too_many.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn booking_errors_map_to_conflict_and_not_found() {
        let conflict: AppError = ServiceError::Conflict("taken".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let missing: AppError = ServiceError::NotFound("session".to_string()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err: AppError =
            CoreError::InvariantViolation("Session store not found in depot").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
