//! Domain API modules
//!
//! One flat operation per backend call. Each builds the request through the
//! [`ApiClient`](crate::adapters::ApiClient), passes the response through the
//! normalizer and decodes the payload. Nothing here retries, batches or
//! masks errors.

mod admin;
mod auth;
mod beneficiaries;
mod transactions;
mod users;
mod wallet;

pub use admin::{AdminApi, AdminUserUpdate, WalletAction, WalletAdjustment};
pub use auth::{AuthApi, AuthResponse, Credentials, RegisterRequest};
pub use beneficiaries::BeneficiariesApi;
pub use transactions::{
    Recipient, SendMoneyRequest, SendReceipt, TransactionQuery, TransactionsApi,
};
pub use users::{PasswordChange, ProfileUpdate, UsersApi};
pub use wallet::{AddFundsRequest, WalletApi, WalletReceipt, DEFAULT_FUNDING_METHOD};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::adapters::mock_backend::{MockBackend, MockRoute};
    use crate::adapters::{ApiClient, MemorySessionStore};
    use crate::domain::{BeneficiaryDraft, Role, Session, User, UserStatus};
    use crate::services::SessionManager;

    fn client(server: &MockBackend) -> Arc<ApiClient> {
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStore::new())).unwrap());
        session
            .establish(&Session {
                token: "tok".to_string(),
                user: User::new("1", "alice@example.com"),
            })
            .unwrap();
        Arc::new(
            ApiClient::new_with_base_url(&server.base_url(), Duration::from_secs(5), session)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_login_decodes_token_and_user() {
        let server = MockBackend::start().unwrap();
        let api = AuthApi::new(client(&server));

        let response = api
            .login(&Credentials::new("alice@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(response.access_token, "test-token");
        assert_eq!(response.user.full_name(), "Alice Cooper");
        let sent = server.last_request().unwrap().json();
        assert_eq!(sent, json!({"email": "alice@example.com", "password": "secret"}));
    }

    #[tokio::test]
    async fn test_register_accepts_token_alias() {
        let server = MockBackend::start().unwrap();
        let api = AuthApi::new(client(&server));

        let response = api
            .register(&RegisterRequest {
                first_name: "Alice".to_string(),
                last_name: "Cooper".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(response.access_token, "test-token");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@b.c", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_add_funds_defaults_to_card() {
        let server = MockBackend::start().unwrap();
        let api = WalletApi::new(client(&server));

        let receipt = api
            .add_funds(&AddFundsRequest::new(Decimal::new(100, 0)))
            .await
            .unwrap();

        assert_eq!(receipt.wallet.unwrap().balance, Decimal::new(13505, 1));
        assert_eq!(
            server.last_request().unwrap().json(),
            json!({"amount": 100.0, "note": "", "method": "card"})
        );
    }

    #[tokio::test]
    async fn test_send_body_uses_recipient_key() {
        let server = MockBackend::start().unwrap();
        let api = TransactionsApi::new(client(&server));

        api.send(&SendMoneyRequest {
            recipient: Recipient::WalletId("FP-2002".to_string()),
            amount: Decimal::new(100, 0),
            note: "rent".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(
            server.last_request().unwrap().json(),
            json!({"wallet_id": "FP-2002", "amount": 100.0, "note": "rent"})
        );
    }

    #[tokio::test]
    async fn test_list_transactions_uses_default_query() {
        let server = MockBackend::start().unwrap();
        let api = TransactionsApi::new(client(&server));

        let txs = api.list(&TransactionQuery::default()).await.unwrap();

        assert_eq!(txs.len(), 3);
        assert_eq!(txs[2].transaction_id, "3");
        assert_eq!(
            server.last_request().unwrap().query.as_deref(),
            Some("type=all&limit=50")
        );
    }

    #[tokio::test]
    async fn test_beneficiary_crud_paths() {
        let server = MockBackend::start().unwrap();
        server.route(MockRoute::json(
            "DELETE",
            "/api/beneficiaries/2",
            200,
            json!({"success": true, "message": "Beneficiary deleted"}),
        ));
        server.route(MockRoute::json(
            "PUT",
            "/api/beneficiaries/2",
            200,
            json!({"success": true, "data": {"id": 2, "name": "Carol K", "wallet_id": "FP-3003"}}),
        ));
        let api = BeneficiariesApi::new(client(&server));

        let all = api.list().await.unwrap();
        assert_eq!(all.len(), 2);

        let created = api
            .create(&BeneficiaryDraft {
                name: "Dan Brown".to_string(),
                tag: None,
                wallet_id: "FP-4004".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, "3");

        let updated = api
            .update("2", &BeneficiaryDraft::from(&all[1]))
            .await
            .unwrap();
        assert_eq!(updated.name, "Carol K");

        let ack = api.delete("2").await.unwrap();
        assert_eq!(ack.message_or("Deleted"), "Beneficiary deleted");
    }

    #[tokio::test]
    async fn test_unknown_beneficiary_is_backend_error() {
        let server = MockBackend::start().unwrap();
        let api = BeneficiariesApi::new(client(&server));

        let err = api.get("404").await.unwrap_err();
        assert_eq!(err.api_error().unwrap().status, 404);
        assert_eq!(err.user_message(), "Endpoint not found");
    }

    #[tokio::test]
    async fn test_admin_stats_and_wallets() {
        let server = MockBackend::start().unwrap();
        let api = AdminApi::new(client(&server));

        let stats = api.stats().await.unwrap();
        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.total_wallet_balance, Decimal::new(12500, 0));

        let wallets = api.wallets().await.unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[1].balance, Decimal::new(74950, 2));
    }

    #[tokio::test]
    async fn test_admin_mutation_bodies() {
        let server = MockBackend::start().unwrap();
        server.route(MockRoute::json(
            "PUT",
            "/api/admin/users/5",
            200,
            json!({"success": true}),
        ));
        let api = AdminApi::new(client(&server));

        api.update_user("5", &AdminUserUpdate::status(UserStatus::Suspended))
            .await
            .unwrap();
        assert_eq!(
            server.last_request().unwrap().json(),
            json!({"status": "suspended"})
        );

        api.update_user("5", &AdminUserUpdate::role(Role::Admin))
            .await
            .unwrap();
        assert_eq!(server.last_request().unwrap().json(), json!({"role": "admin"}));

        let receipt = api
            .adjust_wallet(
                "10",
                &WalletAdjustment {
                    action: WalletAction::Deduct,
                    amount: Decimal::new(50, 0),
                },
            )
            .await
            .unwrap();
        assert!(receipt.wallet.is_some());
        assert_eq!(
            server.last_request().unwrap().json(),
            json!({"action": "deduct", "amount": 50.0})
        );
    }

    #[tokio::test]
    async fn test_change_password_ack() {
        let server = MockBackend::start().unwrap();
        let api = UsersApi::new(client(&server));

        let ack = api
            .change_password(&PasswordChange {
                current_password: "old".to_string(),
                new_password: "new".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ack.message.as_deref(), Some("Password updated"));
    }
}
