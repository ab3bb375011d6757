use thiserror::Error;

/// Caller-visible failures. None of these are retried internally; they are
/// either caller mistakes or business-rule violations and surface verbatim.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Game session not found")]
    SessionNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Student not found")]
    StudentNotFound,
    #[error("Course not found")]
    CourseNotFound,
    #[error("{0}")]
    AccessDenied(String),
    #[error("Game is already complete")]
    GameAlreadyComplete,
    #[error("No words available")]
    NoWordsAvailable,
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GameError {
    pub fn access_denied(reason: impl Into<String>) -> Self {
        GameError::AccessDenied(reason.into())
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        GameError::InvalidRequest(reason.into())
    }
}
