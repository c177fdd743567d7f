/**
 * API Error Types
 *
 * This module defines the error type used by HTTP handlers. Every handler
 * returns `Result<_, ApiError>` and the error is converted to a JSON
 * response by the `conversion` module.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced by the API layer
///
/// # Usage
///
/// ```rust
/// use artgram::error::ApiError;
///
/// let err = ApiError::validation("Please provide a message with your comment.");
/// assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Target missing, or the actor is not allowed to touch it. The two
    /// cases are collapsed on the wire to avoid leaking existence.
    #[error("{0}")]
    NotFoundOrUnauthorized(String),

    /// Missing or invalid credential
    #[error("Not authorized.")]
    Unauthenticated,

    /// Database failure
    #[error("Internal server error")]
    Database(#[from] sqlx::Error),

    /// Serialization failure
    #[error("Internal server error")]
    Serialization(#[from] serde_json::Error),

    /// Anything else unexpected
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a 404-shaped not-found/not-authorized error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundOrUnauthorized(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFoundOrUnauthorized(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the message exposed to the client
    ///
    /// Database and internal errors return a generic message; the underlying
    /// error is logged, not leaked.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
