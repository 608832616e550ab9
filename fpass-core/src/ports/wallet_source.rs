//! Wallet source port - something the refresh monitor can poll

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::Wallet;

/// Produces a fresh wallet snapshot on demand
///
/// The auth context implements this against the backend; tests substitute
/// counters and sleepers.
#[async_trait]
pub trait WalletSource: Send + Sync {
    async fn refresh_wallet(&self) -> Result<Wallet>;
}
