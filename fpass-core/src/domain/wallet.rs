//! Wallet domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::{self, deserialize_optional_id};

/// Largest drift between an optimistic balance and the authoritative one that
/// still counts as reconciled (one cent)
pub fn reconcile_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Owner details attached to admin wallet listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletOwner {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl WalletOwner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A user's wallet snapshot
///
/// One wallet per user is assumed. The client never owns the balance; every
/// value here is a copy of what the backend last reported (or an optimistic
/// projection of it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Record id; admin endpoints address wallets by it
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Public wallet identifier used for transfers
    #[serde(default)]
    pub wallet_id: String,
    #[serde(with = "wire::amount", default)]
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<WalletOwner>,
}

/// Currency assumed when the backend omits one
pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Wallet {
    pub fn new(wallet_id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: None,
            wallet_id: wallet_id.into(),
            balance,
            currency: default_currency(),
            status: None,
            user: None,
        }
    }

    /// Identifier the admin endpoints expect
    pub fn admin_key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.wallet_id)
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }

    /// Balance after a send of `total` (amount plus fee), before the backend confirms
    pub fn after_debit(&self, total: Decimal) -> Self {
        let mut next = self.clone();
        next.balance -= total;
        next
    }

    /// Balance after adding funds, before the backend confirms
    pub fn after_credit(&self, amount: Decimal) -> Self {
        let mut next = self.clone();
        next.balance += amount;
        next
    }

    /// True when `authoritative` agrees with this projection within tolerance
    pub fn reconciles_with(&self, authoritative: &Wallet) -> bool {
        (self.balance - authoritative.balance).abs() <= reconcile_tolerance()
    }

    /// Admin console search over the owner's name and email
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.user.as_ref().is_some_and(|owner| {
            owner.full_name().to_lowercase().contains(&needle)
                || owner.email.to_lowercase().contains(&needle)
        })
    }
}

/// Admin console filter over the wallet list
#[derive(Debug, Clone, Default)]
pub struct WalletFilter {
    pub search: String,
    /// `None` means all statuses
    pub status: Option<String>,
}

impl WalletFilter {
    pub fn matches(&self, wallet: &Wallet) -> bool {
        let status_ok = match &self.status {
            None => true,
            Some(s) => wallet.status.as_deref() == Some(s.as_str()),
        };
        status_ok && wallet.matches_search(&self.search)
    }

    pub fn apply<'a>(&self, wallets: &'a [Wallet]) -> Vec<&'a Wallet> {
        wallets.iter().filter(|w| self.matches(w)).collect()
    }
}

/// Aggregates shown above the admin wallet table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletTotals {
    pub total_balance: Decimal,
    pub average_balance: Decimal,
    pub active_wallets: usize,
}

impl WalletTotals {
    pub fn compute(wallets: &[Wallet]) -> Self {
        let total_balance: Decimal = wallets.iter().map(|w| w.balance).sum();
        let average_balance = if wallets.is_empty() {
            Decimal::ZERO
        } else {
            (total_balance / Decimal::from(wallets.len())).round_dp(2)
        };

        Self {
            total_balance,
            average_balance,
            active_wallets: wallets.iter().filter(|w| w.is_active()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owned(name: &str, email: &str, balance: i64, status: &str) -> Wallet {
        let mut wallet = Wallet::new("W-1", Decimal::new(balance, 2));
        wallet.status = Some(status.to_string());
        wallet.user = Some(WalletOwner {
            first_name: name.to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
        });
        wallet
    }

    #[test]
    fn test_deserialize_numeric_balance() {
        let wallet: Wallet =
            serde_json::from_value(json!({"wallet_id": "FP-001", "balance": 1250.5, "currency": "KES"}))
                .unwrap();
        assert_eq!(wallet.balance, Decimal::new(12505, 1));
        assert_eq!(wallet.currency, "KES");
        assert_eq!(wallet.admin_key(), "FP-001");
    }

    #[test]
    fn test_admin_key_prefers_record_id() {
        let wallet: Wallet =
            serde_json::from_value(json!({"id": 9, "wallet_id": "FP-009", "balance": "0"})).unwrap();
        assert_eq!(wallet.admin_key(), "9");
        assert_eq!(wallet.currency, "USD");
    }

    #[test]
    fn test_optimistic_projections() {
        let wallet = Wallet::new("W", Decimal::new(50000, 2));
        assert_eq!(wallet.after_debit(Decimal::new(10150, 2)).balance, Decimal::new(39850, 2));
        assert_eq!(wallet.after_credit(Decimal::new(2500, 2)).balance, Decimal::new(52500, 2));
    }

    #[test]
    fn test_reconcile_tolerance() {
        let projected = Wallet::new("W", Decimal::new(39850, 2));
        assert!(projected.reconciles_with(&Wallet::new("W", Decimal::new(39851, 2))));
        assert!(!projected.reconciles_with(&Wallet::new("W", Decimal::new(39900, 2))));
    }

    #[test]
    fn test_filter_and_totals() {
        let wallets = vec![
            owned("Alice", "alice@example.com", 10000, "active"),
            owned("Bob", "bob@example.com", 5000, "suspended"),
        ];

        let filter = WalletFilter {
            search: "ALICE".to_string(),
            status: None,
        };
        assert_eq!(filter.apply(&wallets).len(), 1);

        let filter = WalletFilter {
            search: String::new(),
            status: Some("suspended".to_string()),
        };
        assert_eq!(filter.apply(&wallets)[0].user.as_ref().unwrap().first_name, "Bob");

        let totals = WalletTotals::compute(&wallets);
        assert_eq!(totals.total_balance, Decimal::new(15000, 2));
        assert_eq!(totals.average_balance, Decimal::new(7500, 2));
        assert_eq!(totals.active_wallets, 1);
    }
}
