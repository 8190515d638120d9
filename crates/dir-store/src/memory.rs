//! In-memory storage provider.
//!
//! Backs unit and integration tests and ephemeral tooling. Not durable.

use std::collections::HashMap;

use async_trait::async_trait;
use dir_model::{Invitation, UserAccount};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::provider::DirectoryStore;

/// In-memory [`DirectoryStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, UserAccount>>,
    invitations: RwLock<HashMap<Uuid, Invitation>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn get_account(&self, email: &str) -> StorageResult<Option<UserAccount>> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn put_account(&self, account: &UserAccount) -> StorageResult<()> {
        self.accounts
            .write()
            .await
            .insert(account.email.clone(), account.clone());
        Ok(())
    }

    async fn delete_account(&self, email: &str) -> StorageResult<()> {
        self.accounts.write().await.remove(email);
        Ok(())
    }

    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>> {
        let mut accounts: Vec<UserAccount> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(accounts)
    }

    async fn get_invitation(&self, id: Uuid) -> StorageResult<Option<Invitation>> {
        Ok(self.invitations.read().await.get(&id).cloned())
    }

    async fn find_invitation_by_token(&self, token: &str) -> StorageResult<Option<Invitation>> {
        Ok(self
            .invitations
            .read()
            .await
            .values()
            .find(|invite| invite.token == token)
            .cloned())
    }

    async fn put_invitation(&self, invitation: &Invitation) -> StorageResult<()> {
        self.invitations
            .write()
            .await
            .insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn list_invitations_by_email(&self, email: &str) -> StorageResult<Vec<Invitation>> {
        let mut invitations: Vec<Invitation> = self
            .invitations
            .read()
            .await
            .values()
            .filter(|invite| invite.email == email)
            .cloned()
            .collect();
        invitations.sort_by_key(|invite| invite.invited_at);
        Ok(invitations)
    }

    async fn delete_invitations_by_email(&self, email: &str) -> StorageResult<()> {
        self.invitations
            .write()
            .await
            .retain(|_, invite| invite.email != email);
        Ok(())
    }
}
