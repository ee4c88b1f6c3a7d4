//! Command handlers wiring the repository, session, and credential store.

use anyhow::{bail, Context};
use auth_repository::{AuthRepository, Resource};
use client_core::{Config, Paths};
use credential_store::{CredentialStore, FilePrefs};
use reqwest::Method;
use session_engine::{ApiClient, AuthError, AuthResponse, AuthStateBroadcaster, HttpSession};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Assembled client components for one CLI invocation.
pub struct App {
    repo: AuthRepository,
    session: Arc<HttpSession>,
    auth_state: Arc<AuthStateBroadcaster>,
    store: Arc<CredentialStore>,
}

impl App {
    /// Wire up the credential store, auth state, API client, and session.
    pub async fn build(config: &Config, paths: &Paths) -> anyhow::Result<Self> {
        paths.ensure_dirs()?;

        let prefs = FilePrefs::open(paths.credentials_file())
            .await
            .context("Failed to open credential store")?;
        let store = Arc::new(CredentialStore::new(Box::new(prefs)));
        let auth_state = Arc::new(AuthStateBroadcaster::new(store.clone()));
        let api = Arc::new(ApiClient::new(&config.api_base_url)?);
        let session = Arc::new(HttpSession::new(
            &config.api_base_url,
            store.clone(),
            auth_state.clone(),
            api.clone(),
        )?);
        let repo = AuthRepository::new(api, store.clone(), auth_state.clone());

        debug!(api = %config.api_base_url, "Client assembled");

        Ok(Self {
            repo,
            session,
            auth_state,
            store,
        })
    }

    /// Drain a repository stream, returning the success value or the
    /// reported error message.
    async fn drain<T>(mut rx: mpsc::Receiver<Resource<T>>) -> anyhow::Result<T> {
        while let Some(event) = rx.recv().await {
            match event {
                Resource::Loading => {}
                Resource::Success(value) => return Ok(value),
                Resource::Error(message) => bail!(message),
            }
        }
        bail!("Operation ended without a result")
    }

    fn print_session(response: &AuthResponse) {
        println!("Signed in as {} ({})", response.user.email, response.user.id);
    }

    pub async fn signup(&self, full_name: &str, email: &str, password: &str) -> anyhow::Result<()> {
        let response = Self::drain(self.repo.signup(full_name, email, password)).await?;
        println!("Account created.");
        Self::print_session(&response);
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let response = Self::drain(self.repo.login(email, password)).await?;
        Self::print_session(&response);
        Ok(())
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        match Self::drain(self.repo.logout()).await {
            Ok(detail) => println!("{detail}"),
            // Local sign-out already happened; the server just didn't confirm.
            Err(e) => println!("Signed out locally ({e})"),
        }
        Ok(())
    }

    pub async fn status(&self) -> anyhow::Result<()> {
        let state = self.auth_state.check_auth_status().await;
        if state.is_authenticated() {
            match self.store.user_id().await {
                Some(user_id) => println!("Signed in (user {user_id})"),
                None => println!("Signed in"),
            }
        } else {
            println!("Not signed in");
        }
        Ok(())
    }

    pub async fn profile(&self) -> anyhow::Result<()> {
        let request = self.session.request(Method::GET, "user/profile");
        let response = match self.session.execute(request).await {
            Ok(response) => response,
            Err(AuthError::SessionExpired) => bail!("Session expired. Please login again."),
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            bail!("Profile request failed ({status})");
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            Err(_) => println!("{body}"),
        }
        Ok(())
    }
}
