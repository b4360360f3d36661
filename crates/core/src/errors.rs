use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schedule conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ScheduleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScheduleError::Validation(message.into())
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
