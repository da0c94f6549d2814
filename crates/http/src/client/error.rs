//! Errors surfaced by the to-do API clients

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 400 or 422: the server refused the input
    #[error("Rejected: {0}")]
    Rejected(String),

    /// 401: bad credentials, or a missing, expired or revoked token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Server responded {status}: {message}")]
    Server { status: u16, message: String },

    /// A body could not be encoded or decoded
    #[error("Unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Input rejected before anything was sent
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error envelopes the API uses
///
/// Application errors come as `{"error": "..."}`, request validation
/// failures as `{"detail": "..."}` or `{"detail": [{"loc": [...], "msg": "..."}]}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<Value>,
}

impl ClientError {
    /// Map a status and its already-extracted message
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Rejected(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Map a status and the raw response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        });
        Self::from_status(status, message)
    }

    /// Whether the server rejected the credentials of this request
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized(_) => true,
            Self::Transport(err) => err.status() == Some(StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }
}

/// Human readable message from an error envelope, if the body is one
fn message_from_body(body: &str) -> Option<String> {
    let envelope: ErrorBody = serde_json::from_str(body).ok()?;
    if let Some(error) = envelope.error {
        return Some(error);
    }

    match envelope.detail? {
        Value::String(detail) => Some(detail),
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(validation_message).collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// `"<field>: <msg>"` for one validation item, or just the message
fn validation_message(item: &Value) -> Option<String> {
    let message = item.get("msg")?.as_str()?;
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .and_then(Value::as_str);
    Some(match field {
        Some(field) => format!("{field}: {message}"),
        None => message.to_string(),
    })
}
