//! Direct client for the detection service auth endpoints.
//!
//! This client owns its own HTTP connection pool and never attaches a
//! bearer token. Token refresh has to keep working while the session
//! client is busy failing, so the two must not share middleware.

use crate::{AuthError, AuthResult};
use client_core::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Fallback shown when the server gives us nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Payload for account creation.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Payload for sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for logout and token refresh, both keyed by the refresh token.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// A freshly minted token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Demographic details attached to a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub handedness: Option<String>,
}

/// Prior-diagnosis details attached to a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalInfo {
    pub diagnosis_status: Option<String>,
    pub diagnosis_age: Option<u32>,
}

/// Medication details attached to a user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalInfo {
    pub on_medication: Option<bool>,
    pub medication_name: Option<String>,
}

/// A user as the detection service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRead {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub clinical_info: Option<ClinicalInfo>,
    #[serde(default)]
    pub medical_info: Option<MedicalInfo>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response shared by signup, login, and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserRead,
    pub tokens: AuthTokens,
}

/// Response from logout.
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutResponse {
    pub detail: String,
}

/// Client for the auth endpoints of the detection service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AuthResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(url = %url, "Calling detection service");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body);
            warn!(url = %url, status = %status, message = %message, "API call failed");
            return Err(AuthError::Api { status, message });
        }

        // Decoded here rather than via response.json() so a malformed
        // success body is a Json error, not a transport error.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a new account.
    pub async fn signup(&self, request: &SignupRequest) -> AuthResult<AuthResponse> {
        self.post_json("auth/signup", request).await
    }

    /// Exchange credentials for a token pair.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        self.post_json("auth/login", request).await
    }

    /// Invalidate a refresh token server-side.
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<LogoutResponse> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post_json("auth/logout", &request).await
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<AuthResponse> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post_json("auth/refresh", &request).await
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The service reports errors as `{"detail": "..."}`; some proxies in
/// front of it use `{"message": "..."}` instead. Anything else falls
/// back to a generic message.
pub(crate) fn parse_error_message(body: &str) -> String {
    if body.is_empty() {
        return GENERIC_ERROR_MESSAGE.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("detail")
            .and_then(|d| d.as_str())
            .or_else(|| value.get("message").and_then(|m| m.as_str()))
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string(),
        Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
}
