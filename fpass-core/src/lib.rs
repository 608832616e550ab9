//! F-Pass Core - client library for the F-Pass digital wallet backend
//!
//! This crate implements the client logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Wallet, Transaction, Beneficiary, ...)
//!   and pure money helpers
//! - **ports**: Trait definitions for external dependencies (SessionStore, WalletSource)
//! - **adapters**: Concrete implementations (reqwest HTTP client, session stores)
//! - **api**: One typed operation per backend endpoint
//! - **services**: Session lifecycle, payments, dashboards, export, wallet monitor

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::{ApiClient, FileSessionStore};
use api::{AdminApi, BeneficiariesApi, TransactionsApi, UsersApi, WalletApi};
use config::Config;
use ports::SessionStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{ApiError, Error, Result};
pub use domain::{
    Beneficiary, Session, SessionEvent, Transaction, User, Wallet,
};

/// Main context for F-Pass operations
///
/// This is the primary entry point for all client logic. It holds the
/// session, the HTTP client, the configuration and all services.
pub struct FpassContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub client: Arc<ApiClient>,
    pub auth: Arc<AuthService>,
    pub payments: PaymentsService,
    pub dashboard: DashboardService,
    pub users: UsersApi,
    pub wallet: WalletApi,
    pub transactions: TransactionsApi,
    pub beneficiaries: BeneficiariesApi,
    pub admin: AdminApi,
}

impl FpassContext {
    /// Create a context over the file-backed session in `fpass_dir`
    pub fn new(fpass_dir: &Path) -> Result<Self> {
        let config = Config::load(fpass_dir)?;
        let store = Arc::new(FileSessionStore::new(fpass_dir)?);
        Self::with_store(config, store)
    }

    /// Create a context over any session store
    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let session = Arc::new(SessionManager::new(store)?);
        let client = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);

        let auth = Arc::new(AuthService::new(Arc::clone(&client)));
        let payments = PaymentsService::new(Arc::clone(&client), Arc::clone(&auth));
        let dashboard = DashboardService::new(Arc::clone(&client), Arc::clone(&auth));

        Ok(Self {
            users: UsersApi::new(Arc::clone(&client)),
            wallet: WalletApi::new(Arc::clone(&client)),
            transactions: TransactionsApi::new(Arc::clone(&client)),
            beneficiaries: BeneficiariesApi::new(Arc::clone(&client)),
            admin: AdminApi::new(Arc::clone(&client)),
            config,
            session,
            client,
            auth,
            payments,
            dashboard,
        })
    }

    /// Background wallet refresher on the configured interval
    pub fn wallet_monitor(&self) -> WalletMonitor {
        WalletMonitor::new(self.auth.clone(), self.config.refresh_interval())
    }
}
