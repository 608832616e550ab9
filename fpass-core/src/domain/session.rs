//! Session domain model

use serde::{Deserialize, Serialize};

use super::user::User;

/// Storage key for the bearer token
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the serialized user
pub const USER_KEY: &str = "user";
/// Storage key for the serialized wallet snapshot
pub const WALLET_KEY: &str = "wallet";

/// Every key a session writes; teardown clears all of them
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, USER_KEY, WALLET_KEY];

/// An authenticated session: the bearer token and who it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Where the session lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user logged out
    Logout,
    /// The backend rejected the token (HTTP 401)
    Expired,
}

/// Broadcast to session listeners when the lifecycle changes
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { user_id: String },
    Ended(EndReason),
}
