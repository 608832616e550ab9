//! Wallet endpoints

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::ApiClient;
use crate::domain::result::Result;
use crate::domain::{wire, Wallet};

/// Funding method used when none is given
pub const DEFAULT_FUNDING_METHOD: &str = "card";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddFundsRequest {
    #[serde(with = "wire::amount")]
    pub amount: Decimal,
    pub note: String,
    pub method: String,
}

impl AddFundsRequest {
    /// Card top-up with no note
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            note: String::new(),
            method: DEFAULT_FUNDING_METHOD.to_string(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
}

/// Result of a wallet mutation; the backend may or may not echo the wallet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub wallet: Option<Wallet>,
}

pub struct WalletApi {
    client: Arc<ApiClient>,
}

impl WalletApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET /wallet
    pub async fn get(&self) -> Result<Wallet> {
        self.client.get("/wallet").await?.decode("wallet")
    }

    /// POST /wallet/add-funds
    #[tracing::instrument(skip(self), fields(amount = %request.amount))]
    pub async fn add_funds(&self, request: &AddFundsRequest) -> Result<WalletReceipt> {
        self.client
            .post("/wallet/add-funds", request)
            .await?
            .decode_body()
    }
}
