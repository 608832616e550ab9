//! Payments service - transfers and top-ups with optimistic balance updates
//!
//! Both flows validate locally before any network call, post the mutation,
//! write an optimistic wallet snapshot, then reconcile it against an
//! authoritative refresh.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::ApiClient;
use crate::api::{
    AddFundsRequest, Recipient, SendMoneyRequest, SendReceipt, TransactionsApi, WalletApi,
    WalletReceipt,
};
use crate::domain::money::parse_amount;
use crate::domain::result::Result;
use crate::domain::{TransferQuote, Wallet};

use super::AuthService;

/// The optimistic snapshot and what the backend reported afterwards
#[derive(Debug, Clone, Serialize)]
pub struct BalanceUpdate {
    pub optimistic: Wallet,
    /// `None` when the follow-up refresh failed
    pub authoritative: Option<Wallet>,
}

impl BalanceUpdate {
    /// Best known wallet: the authoritative one when available
    pub fn wallet(&self) -> &Wallet {
        self.authoritative.as_ref().unwrap_or(&self.optimistic)
    }

    /// Difference between the backend balance and the optimistic one
    pub fn drift(&self) -> Option<Decimal> {
        self.authoritative
            .as_ref()
            .map(|w| w.balance - self.optimistic.balance)
    }

    /// True unless the refresh disagreed by more than a cent
    pub fn reconciled(&self) -> bool {
        self.authoritative
            .as_ref()
            .map_or(true, |w| self.optimistic.reconciles_with(w))
    }
}

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub quote: TransferQuote,
    pub receipt: SendReceipt,
    pub balance: BalanceUpdate,
}

#[derive(Debug, Clone)]
pub struct FundingOutcome {
    pub amount: Decimal,
    pub receipt: WalletReceipt,
    pub balance: BalanceUpdate,
}

pub struct PaymentsService {
    auth: Arc<AuthService>,
    transactions: TransactionsApi,
    wallet: WalletApi,
}

impl PaymentsService {
    pub fn new(client: Arc<ApiClient>, auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            transactions: TransactionsApi::new(Arc::clone(&client)),
            wallet: WalletApi::new(client),
        }
    }

    /// Quote a transfer against the wallet the user is looking at
    pub async fn quote(&self, amount_input: &str) -> Result<TransferQuote> {
        parse_amount(amount_input)?;
        let wallet = self.auth.current_wallet().await?;
        TransferQuote::prepare(amount_input, wallet.balance)
    }

    /// Send money: local checks, POST, optimistic debit, reconcile
    #[tracing::instrument(skip(self, note), fields(recipient = %recipient))]
    pub async fn send(
        &self,
        recipient: Recipient,
        amount_input: &str,
        note: &str,
    ) -> Result<TransferOutcome> {
        self.auth.require_session()?;
        let quote = self.quote(amount_input).await?;
        let before = self.auth.current_wallet().await?;

        let receipt = self
            .transactions
            .send(&SendMoneyRequest {
                recipient,
                amount: quote.amount,
                note: note.to_string(),
            })
            .await?;
        info!(amount = %quote.amount, fee = %quote.fee, "transfer accepted");

        let optimistic = before.after_debit(quote.total);
        let balance = self.settle(optimistic).await?;
        Ok(TransferOutcome {
            quote,
            receipt,
            balance,
        })
    }

    /// Add funds: local checks, POST, optimistic credit, reconcile
    #[tracing::instrument(skip(self, note))]
    pub async fn add_funds(
        &self,
        amount_input: &str,
        note: &str,
        method: &str,
    ) -> Result<FundingOutcome> {
        self.auth.require_session()?;
        let amount = parse_amount(amount_input)?;
        let before = self.auth.current_wallet().await?;

        let request = AddFundsRequest::new(amount)
            .with_note(note)
            .with_method(method);
        let receipt = self.wallet.add_funds(&request).await?;
        info!(%amount, "funds added");

        let optimistic = before.after_credit(amount);
        let balance = self.settle(optimistic).await?;
        Ok(FundingOutcome {
            amount,
            receipt,
            balance,
        })
    }

    /// Store the optimistic snapshot, then replace it with the backend's
    async fn settle(&self, optimistic: Wallet) -> Result<BalanceUpdate> {
        self.auth.session().store_wallet(&optimistic)?;

        let authoritative = match self.auth.refresh_wallet().await {
            Ok(wallet) => Some(wallet),
            Err(e) if e.is_unauthenticated() => return Err(e),
            Err(e) => {
                warn!(error = %e, "wallet refresh after mutation failed; keeping optimistic balance");
                None
            }
        };

        let update = BalanceUpdate {
            optimistic,
            authoritative,
        };
        if !update.reconciled() {
            warn!(
                expected = %update.optimistic.balance,
                actual = %update.wallet().balance,
                "balance drift after mutation"
            );
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_backend::{fixture_wallet, MockBackend, MockRoute};
    use crate::adapters::MemorySessionStore;
    use crate::api::Credentials;
    use crate::domain::result::Error;
    use crate::services::SessionManager;
    use serde_json::json;
    use std::time::Duration;

    async fn logged_in(server: &MockBackend) -> PaymentsService {
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())).unwrap());
        let client = Arc::new(
            ApiClient::new_with_base_url(&server.base_url(), Duration::from_secs(5), session)
                .unwrap(),
        );
        let auth = Arc::new(AuthService::new(Arc::clone(&client)));
        auth.login(&Credentials::new("alice@example.com", "secret"))
            .await
            .unwrap();
        PaymentsService::new(client, auth)
    }

    fn wallet_route(balance: f64) -> MockRoute {
        MockRoute::json(
            "GET",
            "/api/wallet",
            200,
            json!({ "success": true, "wallet": fixture_wallet(balance) }),
        )
    }

    #[tokio::test]
    async fn test_send_debits_amount_plus_fee() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        // 1250.50 - (100.00 + 1.50)
        server.route(wallet_route(1149.0));

        let outcome = payments
            .send(Recipient::WalletId("FP-2002".to_string()), "100", "rent")
            .await
            .unwrap();

        assert_eq!(outcome.quote.fee, Decimal::new(150, 2));
        assert_eq!(outcome.quote.total, Decimal::new(10150, 2));
        assert_eq!(outcome.balance.optimistic.balance, Decimal::new(1149, 0));
        assert!(outcome.balance.reconciled());
        assert_eq!(outcome.balance.drift(), Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_send_reports_drift() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        server.route(wallet_route(1100.0));

        let outcome = payments
            .send(Recipient::ReceiverId("2".to_string()), "100", "")
            .await
            .unwrap();

        assert!(!outcome.balance.reconciled());
        assert_eq!(outcome.balance.wallet().balance, Decimal::new(1100, 0));
    }

    #[tokio::test]
    async fn test_invalid_amount_makes_no_call() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        let before = server.requests().len();

        for input in ["0", "-5", "abc", ""] {
            let err = payments
                .send(Recipient::ReceiverId("2".to_string()), input, "")
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "input {:?}", input);
        }
        assert_eq!(server.requests().len(), before);
    }

    #[tokio::test]
    async fn test_insufficient_balance_makes_no_call() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        let before = server.requests().len();

        // 1240 + 18.60 fee > 1250.50
        let err = payments
            .send(Recipient::ReceiverId("2".to_string()), "1240", "")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InsufficientBalance { .. }));
        assert_eq!(server.requests().len(), before);
        assert_eq!(
            payments.auth.session().wallet().unwrap().unwrap().balance,
            Decimal::new(12505, 1)
        );
    }

    #[tokio::test]
    async fn test_add_funds_credits_amount() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        server.route(wallet_route(1350.5));

        let outcome = payments.add_funds("100", "", "card").await.unwrap();

        assert_eq!(outcome.balance.optimistic.balance, Decimal::new(13505, 1));
        assert!(outcome.balance.reconciled());
        let sent = server.requests_to("/api/wallet/add-funds").pop().unwrap();
        assert_eq!(sent.json()["method"], "card");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_optimistic_balance() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        server.route(MockRoute::text("GET", "/api/wallet", 503, "down"));

        let outcome = payments.add_funds("10", "", "card").await.unwrap();

        assert!(outcome.balance.authoritative.is_none());
        assert_eq!(
            payments.auth.session().wallet().unwrap().unwrap().balance,
            Decimal::new(12605, 1)
        );
    }

    #[tokio::test]
    async fn test_send_requires_login() {
        let server = MockBackend::start().unwrap();
        let payments = logged_in(&server).await;
        payments.auth.logout().unwrap();

        let err = payments
            .send(Recipient::ReceiverId("2".to_string()), "10", "")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
    }
}
