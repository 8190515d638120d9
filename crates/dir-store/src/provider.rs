//! Directory storage provider trait.

use async_trait::async_trait;
use dir_model::{Invitation, UserAccount};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for account and invitation storage.
///
/// Implementations must be thread-safe. Absent records are `Ok(None)` or
/// empty collections; errors carry infrastructure failures only.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Gets an account by its normalized email key.
    async fn get_account(&self, email: &str) -> StorageResult<Option<UserAccount>>;

    /// Creates or replaces an account record.
    async fn put_account(&self, account: &UserAccount) -> StorageResult<()>;

    /// Hard-deletes an account record. Deleting an absent record is a
    /// no-op.
    async fn delete_account(&self, email: &str) -> StorageResult<()>;

    /// Lists every account record.
    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>>;

    /// Gets an invitation by id.
    async fn get_invitation(&self, id: Uuid) -> StorageResult<Option<Invitation>>;

    /// Gets an invitation by its bearer token.
    async fn find_invitation_by_token(&self, token: &str) -> StorageResult<Option<Invitation>>;

    /// Creates or replaces an invitation record.
    async fn put_invitation(&self, invitation: &Invitation) -> StorageResult<()>;

    /// Lists every invitation for an email.
    async fn list_invitations_by_email(&self, email: &str) -> StorageResult<Vec<Invitation>>;

    /// Hard-deletes every invitation for an email.
    async fn delete_invitations_by_email(&self, email: &str) -> StorageResult<()>;
}
