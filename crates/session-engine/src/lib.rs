//! Token-backed HTTP session management for the NeuroScan client.
//!
//! The engine has three pieces: [`ApiClient`] talks to the auth
//! endpoints over its own connection pool, [`AuthStateBroadcaster`]
//! fans out signed-in/signed-out transitions, and [`HttpSession`]
//! attaches bearer tokens to outbound requests and transparently
//! refreshes them on 401.

mod api;
mod error;
mod session;
mod state;

pub use api::{
    ApiClient, AuthResponse, AuthTokens, ClinicalInfo, LoginRequest, LogoutResponse, MedicalInfo,
    PersonalInfo, RefreshTokenRequest, SignupRequest, UserRead, GENERIC_ERROR_MESSAGE,
};
pub use error::{AuthError, AuthResult};
pub use session::HttpSession;
pub use state::{AuthState, AuthStateBroadcaster};
