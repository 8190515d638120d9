//! Primary/fallback storage decorator.
//!
//! Every operation first tries the primary durable backend. If the primary
//! reports an infrastructure failure the same operation is retried once
//! against the fallback and the fallback's result is returned. Business
//! rules never surface through [`crate::StorageError`], so nothing routed
//! here can be a caller error — fallback is reserved for backend
//! unavailability.

use std::sync::Arc;

use async_trait::async_trait;
use dir_model::{Invitation, UserAccount};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::provider::DirectoryStore;

macro_rules! with_fallback {
    ($self:ident, $op:literal, $call:ident ( $($arg:expr),* )) => {
        match $self.primary.$call($($arg),*).await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    operation = $op,
                    error = %err,
                    "primary directory store unavailable; retrying on fallback",
                );
                $self.fallback.$call($($arg),*).await
            }
        }
    };
}

/// Decorator pairing a primary durable store with a local fallback.
pub struct FailoverStore {
    primary: Arc<dyn DirectoryStore>,
    fallback: Arc<dyn DirectoryStore>,
}

impl FailoverStore {
    /// Creates a failover pair.
    #[must_use]
    pub fn new(primary: Arc<dyn DirectoryStore>, fallback: Arc<dyn DirectoryStore>) -> Self {
        Self { primary, fallback }
    }

    /// The primary backend.
    #[must_use]
    pub fn primary(&self) -> Arc<dyn DirectoryStore> {
        Arc::clone(&self.primary)
    }

    /// The fallback backend.
    #[must_use]
    pub fn fallback(&self) -> Arc<dyn DirectoryStore> {
        Arc::clone(&self.fallback)
    }
}

#[async_trait]
impl DirectoryStore for FailoverStore {
    async fn get_account(&self, email: &str) -> StorageResult<Option<UserAccount>> {
        with_fallback!(self, "get_account", get_account(email))
    }

    async fn put_account(&self, account: &UserAccount) -> StorageResult<()> {
        with_fallback!(self, "put_account", put_account(account))
    }

    async fn delete_account(&self, email: &str) -> StorageResult<()> {
        with_fallback!(self, "delete_account", delete_account(email))
    }

    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>> {
        with_fallback!(self, "list_accounts", list_accounts())
    }

    async fn get_invitation(&self, id: Uuid) -> StorageResult<Option<Invitation>> {
        with_fallback!(self, "get_invitation", get_invitation(id))
    }

    async fn find_invitation_by_token(&self, token: &str) -> StorageResult<Option<Invitation>> {
        with_fallback!(self, "find_invitation_by_token", find_invitation_by_token(token))
    }

    async fn put_invitation(&self, invitation: &Invitation) -> StorageResult<()> {
        with_fallback!(self, "put_invitation", put_invitation(invitation))
    }

    async fn list_invitations_by_email(&self, email: &str) -> StorageResult<Vec<Invitation>> {
        with_fallback!(self, "list_invitations_by_email", list_invitations_by_email(email))
    }

    async fn delete_invitations_by_email(&self, email: &str) -> StorageResult<()> {
        with_fallback!(self, "delete_invitations_by_email", delete_invitations_by_email(email))
    }
}
