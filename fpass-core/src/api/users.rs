//! User endpoints: profile and password

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::adapters::{Ack, ApiClient};
use crate::domain::result::Result;
use crate::domain::User;

/// Profile fields to change; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

pub struct UsersApi {
    client: Arc<ApiClient>,
}

impl UsersApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET /users/profile
    pub async fn profile(&self) -> Result<User> {
        self.client.get("/users/profile").await?.decode("user")
    }

    /// PUT /users/profile
    #[tracing::instrument(skip(self))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.client
            .put("/users/profile", update)
            .await?
            .decode("user")
    }

    /// POST /users/change-password
    #[tracing::instrument(skip_all)]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Ack> {
        self.client
            .post("/users/change-password", change)
            .await?
            .ack()
    }

    /// GET /users
    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get("/users").await?.decode("users")
    }
}
