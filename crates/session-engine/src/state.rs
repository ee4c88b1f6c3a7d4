//! Authentication state broadcasting.

use credential_store::CredentialStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// The client's view of whether a user is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Single source of truth for auth state.
///
/// Built on a watch channel, so every subscriber immediately observes
/// the latest state and then each subsequent transition. Starts out
/// `Unauthenticated` until someone consults the credential store via
/// [`check_auth_status`](AuthStateBroadcaster::check_auth_status).
pub struct AuthStateBroadcaster {
    store: Arc<CredentialStore>,
    tx: watch::Sender<AuthState>,
}

impl AuthStateBroadcaster {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let (tx, _rx) = watch::channel(AuthState::Unauthenticated);
        Self { store, tx }
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    /// The most recently broadcast state.
    pub fn current(&self) -> AuthState {
        *self.tx.borrow()
    }

    /// Mark the user as signed in.
    pub fn set_authenticated(&self) {
        debug!("Auth state: authenticated");
        self.tx.send_replace(AuthState::Authenticated);
    }

    /// Mark the user as signed out, wiping stored credentials first so
    /// that a subscriber reacting to the broadcast never observes stale
    /// tokens.
    pub async fn set_unauthenticated(&self) {
        info!("Auth state: unauthenticated, clearing stored credentials");
        self.store.clear_all().await;
        self.tx.send_replace(AuthState::Unauthenticated);
    }

    /// Derive the state from stored credentials and broadcast it.
    ///
    /// The user counts as signed in only when both tokens are present
    /// and non-empty.
    pub async fn check_auth_status(&self) -> AuthState {
        let access = self.store.access_token().await;
        let refresh = self.store.refresh_token().await;

        let signed_in = access.is_some_and(|t| !t.is_empty())
            && refresh.is_some_and(|t| !t.is_empty());

        let state = if signed_in {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };

        debug!(?state, "Derived auth state from stored credentials");
        self.tx.send_replace(state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_store;

    #[tokio::test]
    async fn test_starts_unauthenticated() {
        let broadcaster = AuthStateBroadcaster::new(memory_store().await);
        assert_eq!(broadcaster.current(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_latest_state() {
        let broadcaster = AuthStateBroadcaster::new(memory_store().await);
        broadcaster.set_authenticated();

        // Subscribing after the transition still yields the current value.
        let rx = broadcaster.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Authenticated);
    }

    #[tokio::test]
    async fn test_subscriber_observes_transitions() {
        let broadcaster = AuthStateBroadcaster::new(memory_store().await);
        let mut rx = broadcaster.subscribe();

        broadcaster.set_authenticated();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::Authenticated);

        broadcaster.set_unauthenticated().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_set_unauthenticated_clears_all_credentials() {
        let store = memory_store().await;
        store.save_access_token("T1").await;
        store.save_refresh_token("R1").await;
        store.save_user_id("user-1").await;

        let broadcaster = AuthStateBroadcaster::new(store.clone());
        broadcaster.set_unauthenticated().await;

        assert_eq!(store.access_token().await, None);
        assert_eq!(store.refresh_token().await, None);
        assert_eq!(store.user_id().await, None);
    }

    #[tokio::test]
    async fn test_set_unauthenticated_is_idempotent() {
        let broadcaster = AuthStateBroadcaster::new(memory_store().await);

        broadcaster.set_unauthenticated().await;
        broadcaster.set_unauthenticated().await;
        assert_eq!(broadcaster.current(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_check_auth_status_requires_both_tokens() {
        let store = memory_store().await;
        let broadcaster = AuthStateBroadcaster::new(store.clone());

        assert_eq!(
            broadcaster.check_auth_status().await,
            AuthState::Unauthenticated
        );

        store.save_access_token("T1").await;
        assert_eq!(
            broadcaster.check_auth_status().await,
            AuthState::Unauthenticated
        );

        store.save_refresh_token("R1").await;
        assert_eq!(
            broadcaster.check_auth_status().await,
            AuthState::Authenticated
        );
    }

    #[tokio::test]
    async fn test_check_auth_status_rejects_empty_tokens() {
        let store = memory_store().await;
        store.save_access_token("").await;
        store.save_refresh_token("R1").await;

        let broadcaster = AuthStateBroadcaster::new(store.clone());
        assert_eq!(
            broadcaster.check_auth_status().await,
            AuthState::Unauthenticated
        );
    }
}
