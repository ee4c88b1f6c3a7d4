//! Error types for the session engine.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while talking to the detection service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport-level failure (connect, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    /// The session could not be recovered; the user must sign in again
    #[error("Session expired, sign in required")]
    SessionExpired,

    /// A response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether this error is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthError::Http(e) if e.is_timeout())
    }

    /// Status code of the server response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthError::Api { status, .. } => Some(*status),
            AuthError::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
