//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation and filtering logic - no I/O.

mod beneficiary;
pub mod money;
pub mod result;
mod session;
mod stats;
mod transaction;
mod user;
mod wallet;
pub mod wire;

pub use beneficiary::{search as search_beneficiaries, Beneficiary, BeneficiaryDraft};
pub use money::{format_currency, format_usd, TransferQuote};
pub use session::{
    AuthState, EndReason, Session, SessionEvent, ACCESS_TOKEN_KEY, SESSION_KEYS, USER_KEY,
    WALLET_KEY,
};
pub use stats::AdminStats;
pub use transaction::{Direction, MonthlySummary, Transaction, TransactionType};
pub use user::{Role, User, UserFilter, UserStatus};
pub use wallet::{reconcile_tolerance, Wallet, DEFAULT_CURRENCY, WalletFilter, WalletOwner, WalletTotals};
