//! Access token payload decoding
//!
//! The token is issued by our own API, so the client only reads the payload
//! and never verifies the signature.

use crate::error::{SessionError, SessionResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize};
use todo_http::User;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject identifier; some issuers send it as a number
    #[serde(deserialize_with = "subject_as_string")]
    pub sub: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl AccessTokenClaims {
    /// Decode the payload segment of `token`
    pub fn decode(token: &str) -> SessionResult<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(SessionError::invalid_token("expected three segments")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| SessionError::invalid_token(format!("payload is not base64url: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::invalid_token(format!("unexpected payload: {e}")))
    }
}

fn subject_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Text(String),
        Number(i64),
    }

    Ok(match Subject::deserialize(deserializer)? {
        Subject::Text(text) => text,
        Subject::Number(number) => number.to_string(),
    })
}
