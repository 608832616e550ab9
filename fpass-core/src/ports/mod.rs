//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod session_store;
mod wallet_source;

pub use session_store::SessionStore;
pub use wallet_source::WalletSource;
