//! Session error types.

use thiserror::Error;

use crate::api_client::ApiError;

/// Main session error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Backend call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Access token could not be decoded.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Persisted-record read or write failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Operation requires a live session.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Token-related errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,

    #[error("token is missing its expiry claim")]
    MissingExpiry,
}

/// Storage-related errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to initialize storage: {0}")]
    InitFailed(String),

    #[error("failed to read persisted session")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write persisted session")]
    WriteFailed(#[source] std::io::Error),

    #[error("corrupted persisted session")]
    CorruptedData,
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
