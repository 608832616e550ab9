//! Admin endpoints: back-office views over users, wallets and transactions

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::{Ack, ApiClient};
use crate::domain::result::{Error, Result};
use crate::domain::{wire, AdminStats, Role, Transaction, User, UserStatus, Wallet};

use super::WalletReceipt;

/// Fields an admin may change on a user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl AdminUserUpdate {
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            role: None,
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            status: None,
            role: Some(role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletAction {
    Add,
    Deduct,
}

impl fmt::Display for WalletAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Deduct => "deduct",
        })
    }
}

impl FromStr for WalletAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "deduct" => Ok(Self::Deduct),
            other => Err(Error::validation(format!(
                "Unknown wallet action '{}'. Use 'add' or 'deduct'.",
                other
            ))),
        }
    }
}

/// Body for POST /admin/wallets/:id/adjust
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletAdjustment {
    pub action: WalletAction,
    #[serde(with = "wire::amount")]
    pub amount: Decimal,
}

pub struct AdminApi {
    client: Arc<ApiClient>,
}

impl AdminApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET /admin/users
    pub async fn users(&self) -> Result<Vec<User>> {
        self.client.get("/admin/users").await?.decode("users")
    }

    /// GET /admin/users/:id
    pub async fn user(&self, id: &str) -> Result<User> {
        self.client
            .get(&format!("/admin/users/{}", id))
            .await?
            .decode("user")
    }

    /// PUT /admin/users/:id
    #[tracing::instrument(skip(self))]
    pub async fn update_user(&self, id: &str, update: &AdminUserUpdate) -> Result<Ack> {
        self.client
            .put(&format!("/admin/users/{}", id), update)
            .await?
            .ack()
    }

    /// DELETE /admin/users/:id
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("/admin/users/{}", id))
            .await?
            .ack()
    }

    /// GET /admin/wallets
    pub async fn wallets(&self) -> Result<Vec<Wallet>> {
        self.client.get("/admin/wallets").await?.decode("wallets")
    }

    /// POST /admin/wallets/:id/adjust
    #[tracing::instrument(skip(self))]
    pub async fn adjust_wallet(
        &self,
        id: &str,
        adjustment: &WalletAdjustment,
    ) -> Result<WalletReceipt> {
        self.client
            .post(&format!("/admin/wallets/{}/adjust", id), adjustment)
            .await?
            .decode_body()
    }

    /// GET /admin/transactions
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.client
            .get("/admin/transactions")
            .await?
            .decode("transactions")
    }

    /// GET /admin/stats
    pub async fn stats(&self) -> Result<AdminStats> {
        self.client.get("/admin/stats").await?.decode("stats")
    }
}
