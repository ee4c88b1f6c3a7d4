//! User-facing error messages.

use reqwest::StatusCode;
use session_engine::{AuthError, GENERIC_ERROR_MESSAGE};

/// Shown for transport failures other than timeouts.
pub const ERROR_NETWORK: &str = "Network error. Please check your connection.";

/// Shown when a request times out.
pub const ERROR_TIMEOUT: &str = "Request timed out. Please try again.";

/// Shown when the session is gone and could not be refreshed.
pub const ERROR_SESSION_EXPIRED: &str = "Unauthorized. Please login again.";

/// Canned message for a response status.
fn message_for_status(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Invalid request. Please check your input.",
        401 => "Unauthorized. Please login again.",
        403 => "Access forbidden.",
        404 => "Resource not found.",
        409 => "Conflict. User may already exist.",
        422 => "Validation error. Please check your input.",
        500 => "Server error. Please try again later.",
        _ => GENERIC_ERROR_MESSAGE,
    }
}

/// Map an engine error to the message shown to the user.
///
/// A concrete message from the server body wins; otherwise the status
/// code picks a canned message. Transport errors never reach the server
/// so they get the network/timeout wording.
pub fn user_message(error: &AuthError) -> String {
    match error {
        AuthError::Api { status, message } => {
            if message != GENERIC_ERROR_MESSAGE {
                message.clone()
            } else {
                message_for_status(*status).to_string()
            }
        }
        AuthError::Http(e) if e.is_timeout() => ERROR_TIMEOUT.to_string(),
        AuthError::Http(_) => ERROR_NETWORK.to_string(),
        AuthError::SessionExpired => ERROR_SESSION_EXPIRED.to_string(),
        AuthError::Json(_) => "Server error. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> AuthError {
        AuthError::Api {
            status: StatusCode::from_u16(status).unwrap(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_server_message_takes_precedence() {
        let err = api_error(401, "Invalid credentials");
        assert_eq!(user_message(&err), "Invalid credentials");
    }

    #[test]
    fn test_generic_body_falls_back_to_status_table() {
        assert_eq!(
            user_message(&api_error(409, GENERIC_ERROR_MESSAGE)),
            "Conflict. User may already exist."
        );
        assert_eq!(
            user_message(&api_error(422, GENERIC_ERROR_MESSAGE)),
            "Validation error. Please check your input."
        );
        assert_eq!(
            user_message(&api_error(500, GENERIC_ERROR_MESSAGE)),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_unmapped_status_stays_generic() {
        assert_eq!(
            user_message(&api_error(418, GENERIC_ERROR_MESSAGE)),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_decode_failure_reported_as_server_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(
            user_message(&AuthError::Json(json_err)),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_session_expired_message() {
        assert_eq!(
            user_message(&AuthError::SessionExpired),
            ERROR_SESSION_EXPIRED
        );
    }
}
