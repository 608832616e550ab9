//! Admin dashboard aggregates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

/// Platform-wide numbers reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default, with = "wire::amount")]
    pub total_revenue: Decimal,
    #[serde(default, with = "wire::amount")]
    pub total_wallet_balance: Decimal,
}

impl AdminStats {
    /// Share of users that are active, whole percent
    pub fn active_user_percent(&self) -> u64 {
        if self.total_users == 0 {
            return 0;
        }
        (self.active_users * 100 + self.total_users / 2) / self.total_users
    }

    /// Revenue per transaction, `None` when there were no transactions
    pub fn average_revenue_per_transaction(&self) -> Option<Decimal> {
        if self.total_transactions == 0 {
            return None;
        }
        Some((self.total_revenue / Decimal::from(self.total_transactions)).round_dp(2))
    }
}
