//! Session layer errors

use thiserror::Error;
use todo_http::ClientError;

/// Standard result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport, authentication or server failure from the API
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The access token payload could not be decoded
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// The caller aborted the operation before it finished
    #[error("Operation cancelled")]
    Cancelled,
}

impl SessionError {
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the server rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Client(error) if error.is_unauthorized())
    }
}
