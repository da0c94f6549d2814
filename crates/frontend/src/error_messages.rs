//! User-friendly error message mappings

use todo_core::SessionError;
use todo_http::ClientError;

/// Message shown for a failed login
pub fn login_error(error: &SessionError) -> String {
    if error.is_unauthorized() {
        "Incorrect username or password.".to_string()
    } else {
        session_error(error)
    }
}

pub fn session_error(error: &SessionError) -> String {
    match error {
        SessionError::Client(error) => client_error(error),
        SessionError::InvalidToken(_) => {
            "The server sent a session we could not read. Please try again.".to_string()
        }
        SessionError::Cancelled => "The request was cancelled.".to_string(),
    }
}

pub fn client_error(error: &ClientError) -> String {
    match error {
        ClientError::Transport(_) => {
            "Connection error. Please check your internet connection and try again.".to_string()
        }
        ClientError::Unauthorized(_) => {
            "Your session has expired. Please sign in again.".to_string()
        }
        ClientError::Forbidden(_) => "You don't have permission to do that.".to_string(),
        ClientError::NotFound(_) => "That item no longer exists.".to_string(),
        ClientError::Rejected(message) | ClientError::Validation(message) => message.clone(),
        ClientError::Server { .. } => {
            "Something went wrong on our end. Please try again later.".to_string()
        }
        ClientError::Decode(_) | ClientError::Configuration(_) => {
            "An unexpected error occurred. Please try again.".to_string()
        }
    }
}
