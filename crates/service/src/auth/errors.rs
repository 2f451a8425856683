use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Username already exists")]
    Conflict,
    #[error("Invalid username or password")]
    Unauthorized,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("Failed to generate token")]
    TokenError(String),
    #[error(transparent)]
    Store(#[from] ServiceError),
}
