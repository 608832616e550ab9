//! Dashboard service - the joined reads behind the landing views

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adapters::ApiClient;
use crate::api::{AdminApi, TransactionQuery, TransactionsApi};
use crate::domain::result::Result;
use crate::domain::{AdminStats, MonthlySummary, Transaction, Wallet};

use super::AuthService;

/// Rows shown under "recent activity"
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct UserDashboard {
    pub wallet: Wallet,
    pub recent: Vec<Transaction>,
    pub month: MonthlySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub stats: AdminStats,
    pub active_user_percent: u64,
    pub recent: Vec<Transaction>,
}

pub struct DashboardService {
    auth: Arc<AuthService>,
    transactions: TransactionsApi,
    admin: AdminApi,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>, auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            transactions: TransactionsApi::new(Arc::clone(&client)),
            admin: AdminApi::new(client),
        }
    }

    /// Wallet and history fetched together; the month summary covers the
    /// whole fetched page, the recent list its first rows
    pub async fn user_dashboard(&self, now: DateTime<Utc>) -> Result<UserDashboard> {
        let session = self.auth.require_session()?;
        let query = TransactionQuery::default();

        let (wallet, history) = tokio::try_join!(
            self.auth.refresh_wallet(),
            self.transactions.list(&query)
        )?;

        let month = MonthlySummary::compute(&history, &session.user.id, now);
        let recent = history.into_iter().take(RECENT_LIMIT).collect();
        Ok(UserDashboard {
            wallet,
            recent,
            month,
        })
    }

    /// Platform figures and latest transactions for the admin console
    pub async fn admin_overview(&self) -> Result<AdminOverview> {
        self.auth.require_session()?;
        let (stats, transactions) =
            tokio::try_join!(self.admin.stats(), self.admin.transactions())?;

        Ok(AdminOverview {
            active_user_percent: stats.active_user_percent(),
            stats,
            recent: transactions.into_iter().take(RECENT_LIMIT).collect(),
        })
    }
}
