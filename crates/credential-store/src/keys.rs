//! Storage key constants.

/// Preference keys used by the client.
pub struct StorageKeys;

impl StorageKeys {
    /// Access token attached to outbound requests
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Refresh token used to mint new token pairs
    pub const REFRESH_TOKEN: &'static str = "refresh_token";

    /// Id of the signed-in user
    pub const USER_ID: &'static str = "user_id";
}
