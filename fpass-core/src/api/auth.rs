//! Auth endpoints: register, login, current user

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapters::ApiClient;
use crate::domain::result::Result;
use crate::domain::User;

/// Login body
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration body
#[derive(Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("country", &self.country)
            .field("password", &"***")
            .finish()
    }
}

/// Token and user returned by login and register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    pub user: User,
}

pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// POST /auth/register
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.client
            .post("/auth/register", request)
            .await?
            .decode_body()
    }

    /// POST /auth/login
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.client
            .post("/auth/login", credentials)
            .await?
            .decode_body()
    }

    /// GET /auth/me
    pub async fn me(&self) -> Result<User> {
        self.client.get("/auth/me").await?.decode("user")
    }
}
