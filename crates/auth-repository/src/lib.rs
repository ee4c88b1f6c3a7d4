//! High-level authentication operations for the NeuroScan client.
//!
//! Each operation returns a channel of [`Resource`] updates: `Loading`
//! first, then exactly one terminal `Success` or `Error`. Consumers
//! drive a UI or CLI off the stream without caring which endpoint ran.

mod messages;
mod resource;

pub use messages::{user_message, ERROR_NETWORK, ERROR_SESSION_EXPIRED, ERROR_TIMEOUT};
pub use resource::Resource;

use credential_store::CredentialStore;
use session_engine::{
    ApiClient, AuthResponse, AuthStateBroadcaster, LoginRequest, SignupRequest,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Repository coordinating the auth API, credential store, and state
/// broadcaster.
#[derive(Clone)]
pub struct AuthRepository {
    api: Arc<ApiClient>,
    store: Arc<CredentialStore>,
    auth_state: Arc<AuthStateBroadcaster>,
}

impl AuthRepository {
    pub fn new(
        api: Arc<ApiClient>,
        store: Arc<CredentialStore>,
        auth_state: Arc<AuthStateBroadcaster>,
    ) -> Self {
        Self {
            api,
            store,
            auth_state,
        }
    }

    async fn persist_session(&self, response: &AuthResponse) {
        self.store
            .save_access_token(&response.tokens.access_token)
            .await;
        self.store
            .save_refresh_token(&response.tokens.refresh_token)
            .await;
        self.store.save_user_id(&response.user.id).await;
        self.auth_state.set_authenticated();
    }

    /// Create an account and sign in.
    pub fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> mpsc::Receiver<Resource<AuthResponse>> {
        let (tx, rx) = mpsc::channel(2);
        let repo = self.clone();
        let request = SignupRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        tokio::spawn(async move {
            let _ = tx.send(Resource::Loading).await;
            match repo.api.signup(&request).await {
                Ok(response) => {
                    info!(user_id = %response.user.id, "Signup succeeded");
                    repo.persist_session(&response).await;
                    let _ = tx.send(Resource::Success(response)).await;
                }
                Err(e) => {
                    warn!(error = %e, "Signup failed");
                    let _ = tx.send(Resource::Error(user_message(&e))).await;
                }
            }
        });

        rx
    }

    /// Sign in with email and password.
    pub fn login(&self, email: &str, password: &str) -> mpsc::Receiver<Resource<AuthResponse>> {
        let (tx, rx) = mpsc::channel(2);
        let repo = self.clone();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        tokio::spawn(async move {
            let _ = tx.send(Resource::Loading).await;
            match repo.api.login(&request).await {
                Ok(response) => {
                    info!(user_id = %response.user.id, "Login succeeded");
                    repo.persist_session(&response).await;
                    let _ = tx.send(Resource::Success(response)).await;
                }
                Err(e) => {
                    warn!(error = %e, "Login failed");
                    let _ = tx.send(Resource::Error(user_message(&e))).await;
                }
            }
        });

        rx
    }

    /// Sign out. The local session ends no matter what the server says;
    /// a failed revocation only changes the reported outcome.
    pub fn logout(&self) -> mpsc::Receiver<Resource<String>> {
        let (tx, rx) = mpsc::channel(2);
        let repo = self.clone();

        tokio::spawn(async move {
            let _ = tx.send(Resource::Loading).await;

            let refresh_token = repo.store.refresh_token().await.filter(|t| !t.is_empty());
            let remote = match refresh_token {
                Some(token) => repo.api.logout(&token).await.map(|r| r.detail),
                None => Ok("Logged out".to_string()),
            };

            repo.auth_state.set_unauthenticated().await;

            match remote {
                Ok(detail) => {
                    info!("Logout succeeded");
                    let _ = tx.send(Resource::Success(detail)).await;
                }
                Err(e) => {
                    warn!(error = %e, "Server-side logout failed, session cleared locally");
                    let _ = tx.send(Resource::Error(user_message(&e))).await;
                }
            }
        });

        rx
    }

    /// Exchange the stored refresh token for a new session.
    pub fn refresh(&self) -> mpsc::Receiver<Resource<AuthResponse>> {
        let (tx, rx) = mpsc::channel(2);
        let repo = self.clone();

        tokio::spawn(async move {
            let _ = tx.send(Resource::Loading).await;

            let refresh_token = repo.store.refresh_token().await.filter(|t| !t.is_empty());
            let Some(refresh_token) = refresh_token else {
                warn!("No refresh token stored, sign in required");
                repo.auth_state.set_unauthenticated().await;
                let _ = tx
                    .send(Resource::Error(ERROR_SESSION_EXPIRED.to_string()))
                    .await;
                return;
            };

            match repo.api.refresh(&refresh_token).await {
                Ok(response) => {
                    info!("Session refreshed");
                    repo.persist_session(&response).await;
                    let _ = tx.send(Resource::Success(response)).await;
                }
                Err(e) => {
                    warn!(error = %e, "Session refresh failed, sign in required");
                    repo.auth_state.set_unauthenticated().await;
                    let _ = tx.send(Resource::Error(user_message(&e))).await;
                }
            }
        });

        rx
    }
}
