//! Authenticated HTTP session with transparent token refresh.

use crate::{ApiClient, AuthError, AuthResult, AuthStateBroadcaster};
use client_core::{CALL_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS};
use credential_store::CredentialStore;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// HTTP session that attaches the stored access token to every request
/// and recovers from 401 responses by refreshing the token pair.
///
/// Refresh is single-flight: when several concurrent requests fail at
/// once, exactly one performs the refresh while the rest wait on the
/// lock and then pick up the fresh token from the store.
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
    auth_state: Arc<AuthStateBroadcaster>,
    api: Arc<ApiClient>,
    refresh_lock: Mutex<()>,
}

impl HttpSession {
    pub fn new(
        base_url: &str,
        store: Arc<CredentialStore>,
        auth_state: Arc<AuthStateBroadcaster>,
        api: Arc<ApiClient>,
    ) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(CALL_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            auth_state,
            api,
            refresh_lock: Mutex::new(()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start building a request against the service. Authentication is
    /// attached by [`execute`](HttpSession::execute), not here.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.endpoint(path))
    }

    /// Send a request with the stored access token attached, retrying
    /// once with a fresh token if the server answers 401.
    pub async fn execute(&self, request: RequestBuilder) -> AuthResult<Response> {
        // Cloned before the token is attached so the retry picks up the
        // refreshed one. Streaming bodies are not cloneable.
        let retry = request.try_clone();

        let token = self.store.access_token().await.filter(|t| !t.is_empty());
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(url = %response.url(), "Request rejected as unauthenticated, attempting recovery");

        let Some(retry) = retry else {
            warn!("Cannot retry a request with a streaming body after 401");
            return Ok(response);
        };

        match self.recover(token.as_deref()).await {
            Some(fresh) => Ok(retry.bearer_auth(fresh).send().await?),
            None => Err(AuthError::SessionExpired),
        }
    }

    /// Obtain a usable access token after a 401, or give up and force
    /// re-login. Returns the token to retry with, if any.
    async fn recover(&self, failed_token: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        // A caller that was queued behind the winning refresh finds a
        // token different from the one its request failed with.
        if let Some(current) = self.store.access_token().await {
            if !current.is_empty() && failed_token != Some(current.as_str()) {
                debug!("Token already refreshed by a concurrent request");
                return Some(current);
            }
        }

        let refresh_token = self.store.refresh_token().await.filter(|t| !t.is_empty());
        let Some(refresh_token) = refresh_token else {
            warn!("No refresh token stored, sign in required");
            self.auth_state.set_unauthenticated().await;
            return None;
        };

        match self.api.refresh(&refresh_token).await {
            Ok(response) => {
                self.store
                    .save_access_token(&response.tokens.access_token)
                    .await;
                self.store
                    .save_refresh_token(&response.tokens.refresh_token)
                    .await;
                info!("Access token refreshed");
                Some(response.tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, sign in required");
                self.auth_state.set_unauthenticated().await;
                None
            }
        }
    }
}
