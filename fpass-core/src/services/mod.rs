//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and the API modules. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod dashboard;
pub mod export;
mod monitor;
mod payments;
mod session;

pub use auth::AuthService;
pub use dashboard::{AdminOverview, DashboardService, UserDashboard, RECENT_LIMIT};
pub use monitor::{MonitorHandle, MonitorUpdate, WalletMonitor};
pub use payments::{BalanceUpdate, FundingOutcome, PaymentsService, TransferOutcome};
pub use session::SessionManager;
