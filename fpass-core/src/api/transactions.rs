//! Transaction endpoints: send, history, detail

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::ApiClient;
use crate::domain::result::Result;
use crate::domain::{wire, Transaction};

/// Who receives a transfer
///
/// The backend accepts either the receiver's user id or their wallet id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    ReceiverId(String),
    WalletId(String),
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReceiverId(id) => write!(f, "user {}", id),
            Self::WalletId(id) => write!(f, "wallet {}", id),
        }
    }
}

/// Transfer body: `{ receiver_id | wallet_id, amount, note }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMoneyRequest {
    #[serde(flatten)]
    pub recipient: Recipient,
    #[serde(with = "wire::amount")]
    pub amount: Decimal,
    pub note: String,
}

/// Result of a transfer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

/// History query; defaults to every type, 50 rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub kind: String,
    pub limit: u32,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            kind: "all".to_string(),
            limit: 50,
        }
    }
}

impl TransactionQuery {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn params(&self) -> [(&'static str, String); 2] {
        [("type", self.kind.clone()), ("limit", self.limit.to_string())]
    }
}

pub struct TransactionsApi {
    client: Arc<ApiClient>,
}

impl TransactionsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// POST /transactions/send
    #[tracing::instrument(skip(self, request), fields(recipient = %request.recipient, amount = %request.amount))]
    pub async fn send(&self, request: &SendMoneyRequest) -> Result<SendReceipt> {
        self.client
            .post("/transactions/send", request)
            .await?
            .decode_body()
    }

    /// GET /transactions?type=..&limit=..
    pub async fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.client
            .get_with_query("/transactions", &query.params())
            .await?
            .decode("transactions")
    }

    /// GET /transactions/:id
    pub async fn get(&self, id: &str) -> Result<Transaction> {
        self.client
            .get(&format!("/transactions/{}", id))
            .await?
            .decode("transaction")
    }
}
