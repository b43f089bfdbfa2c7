use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    ScheduleError(#[from] mentora_schedule::ScheduleError),

    #[error(transparent)]
    StoreError(#[from] mentora_store::error::StoreError),

    #[error(transparent)]
    CoreError(#[from] mentora_core::error::CoreError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
