use thiserror::Error;

/// Failure taxonomy for scheduling operations.
///
/// `Validation`, `NotFound` and `Conflict` are caller-visible rejections with
/// no state change. `Internal` means the generator itself produced
/// inconsistent output and the whole unit of work was aborted. `Store` wraps
/// infrastructure failures from a collaborator.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal consistency: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl SchedulingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SchedulingError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        SchedulingError::NotFound(msg.into())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, SchedulingError::Internal(_))
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
