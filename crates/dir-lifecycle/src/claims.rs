//! Custom-claims propagation seam.
//!
//! After a security-relevant mutation (role change, status change,
//! archival, session revocation) the directory pushes the account's
//! current claims to the external session layer. Propagation is best
//! effort: failures are logged and never fail the originating operation.
//! Deployments that need strict propagation can supply their own
//! implementation and surface failures out of band.

use async_trait::async_trait;
use dir_model::UserAccount;
use thiserror::Error;

/// Claims propagation failure.
#[derive(Debug, Error)]
#[error("claims sync failed: {0}")]
pub struct ClaimsSyncError(pub String);

/// Receiver for account claim updates.
#[async_trait]
pub trait ClaimsSync: Send + Sync {
    /// Pushes the account's current role, status, and session version.
    async fn sync(&self, account: &UserAccount) -> Result<(), ClaimsSyncError>;
}

/// Default claims sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClaimsSync;

#[async_trait]
impl ClaimsSync for NoopClaimsSync {
    async fn sync(&self, _account: &UserAccount) -> Result<(), ClaimsSyncError> {
        Ok(())
    }
}
