//! Auth service - the session lifecycle on top of the auth and wallet endpoints
//!
//! Unauthenticated -> Authenticating on submit, Authenticating ->
//! Authenticated when the backend accepts (token and user persisted, wallet
//! fetched once), back to Unauthenticated on rejection, logout or any 401.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::adapters::ApiClient;
use crate::api::{AuthApi, AuthResponse, Credentials, RegisterRequest, WalletApi};
use crate::domain::result::{Error, Result};
use crate::domain::{Session, User, Wallet};
use crate::ports::WalletSource;

use super::SessionManager;

pub struct AuthService {
    session: Arc<SessionManager>,
    auth: AuthApi,
    wallet: WalletApi,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            session: Arc::clone(client.session()),
            auth: AuthApi::new(Arc::clone(&client)),
            wallet: WalletApi::new(client),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Submit credentials and start a session
    ///
    /// A 401 here means the credentials were wrong, so it comes back as a
    /// plain backend error rather than a session expiry.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.session.begin_login()?;
        let response = self.auth.login(credentials).await;
        self.complete(response).await
    }

    /// Create an account and start a session with the returned token
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session> {
        self.session.begin_login()?;
        let response = self.auth.register(request).await;
        self.complete(response).await
    }

    async fn complete(&self, response: Result<AuthResponse>) -> Result<Session> {
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.session.abort_login()?;
                return Err(match e {
                    Error::Unauthenticated(api) => Error::Api(api),
                    other => other,
                });
            }
        };

        let session = Session {
            token: response.access_token,
            user: response.user,
        };
        self.session.establish(&session)?;
        info!(user_id = %session.user.id, role = %session.user.role, "logged in");

        // The wallet is a convenience; failing to fetch it keeps the session
        if let Err(e) = self.refresh_wallet().await {
            warn!(error = %e, "wallet fetch after login failed");
        }
        Ok(session)
    }

    /// GET /auth/me, caching the result
    pub async fn me(&self) -> Result<User> {
        let user = self.auth.me().await?;
        self.session.store_user(&user)?;
        Ok(user)
    }

    /// Restore a persisted session and revalidate it with the backend
    ///
    /// Returns `None` when no token is stored. A rejected token surfaces as
    /// `Unauthenticated` with the session already cleared.
    pub async fn bootstrap(&self) -> Result<Option<Session>> {
        let token = match self.session.token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        let user = self.me().await?;
        if let Err(e) = self.refresh_wallet().await {
            if e.is_unauthenticated() {
                return Err(e);
            }
            warn!(error = %e, "wallet refresh during bootstrap failed");
        }
        Ok(Some(Session { token, user }))
    }

    /// Fetch the wallet and replace the cached snapshot
    pub async fn refresh_wallet(&self) -> Result<Wallet> {
        let wallet = self.wallet.get().await?;
        self.session.store_wallet(&wallet)?;
        Ok(wallet)
    }

    pub fn logout(&self) -> Result<()> {
        info!("logged out");
        self.session.logout()
    }

    /// The live session, or `NotLoggedIn`
    pub fn require_session(&self) -> Result<Session> {
        self.session.session()?.ok_or(Error::NotLoggedIn)
    }

    /// Cached wallet snapshot, fetched when none is cached yet
    pub async fn current_wallet(&self) -> Result<Wallet> {
        match self.session.wallet()? {
            Some(wallet) => Ok(wallet),
            None => self.refresh_wallet().await,
        }
    }
}

#[async_trait]
impl WalletSource for AuthService {
    async fn refresh_wallet(&self) -> Result<Wallet> {
        AuthService::refresh_wallet(self).await
    }
}
