//! JSON-document implementation of the directory storage provider.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dir_model::{Invitation, UserAccount};
use dir_store::{DirectoryStore, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use uuid::Uuid;

/// The on-disk document holding the whole directory.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    accounts: BTreeMap<String, UserAccount>,
    invitations: BTreeMap<Uuid, Invitation>,
}

/// Local JSON-document directory store.
pub struct LocalDirectoryStore {
    path: PathBuf,
    init: OnceCell<()>,
}

impl LocalDirectoryStore {
    /// Creates a store persisting to the given file path. The file and its
    /// parent directory are created lazily on first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            init: OnceCell::new(),
        }
    }

    /// Opens the store, running the one-time bootstrap before returning a
    /// ready handle.
    ///
    /// ## Errors
    ///
    /// Returns an error if the document or its parent directory cannot be
    /// created.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = Self::new(path);
        store.ensure_init().await?;
        Ok(store)
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One-time bootstrap: concurrent first callers all wait on the same
    /// initialization instead of racing to create the file twice.
    async fn ensure_init(&self) -> StorageResult<()> {
        self.init
            .get_or_try_init(|| async {
                if let Some(parent) = self.path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                if tokio::fs::try_exists(&self.path).await? {
                    return Ok(());
                }
                write_document(&self.path, &Document::default()).await
            })
            .await
            .map(|_| ())
    }

    async fn load(&self) -> StorageResult<Document> {
        self.ensure_init().await?;
        let bytes = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn save(&self, document: &Document) -> StorageResult<()> {
        write_document(&self.path, document).await
    }
}

async fn write_document(path: &Path, document: &Document) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(document)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[async_trait]
impl DirectoryStore for LocalDirectoryStore {
    async fn get_account(&self, email: &str) -> StorageResult<Option<UserAccount>> {
        Ok(self.load().await?.accounts.get(email).cloned())
    }

    async fn put_account(&self, account: &UserAccount) -> StorageResult<()> {
        let mut document = self.load().await?;
        document
            .accounts
            .insert(account.email.clone(), account.clone());
        self.save(&document).await
    }

    async fn delete_account(&self, email: &str) -> StorageResult<()> {
        let mut document = self.load().await?;
        document.accounts.remove(email);
        self.save(&document).await
    }

    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>> {
        Ok(self.load().await?.accounts.into_values().collect())
    }

    async fn get_invitation(&self, id: Uuid) -> StorageResult<Option<Invitation>> {
        Ok(self.load().await?.invitations.get(&id).cloned())
    }

    async fn find_invitation_by_token(&self, token: &str) -> StorageResult<Option<Invitation>> {
        Ok(self
            .load()
            .await?
            .invitations
            .into_values()
            .find(|invite| invite.token == token))
    }

    async fn put_invitation(&self, invitation: &Invitation) -> StorageResult<()> {
        let mut document = self.load().await?;
        document
            .invitations
            .insert(invitation.id, invitation.clone());
        self.save(&document).await
    }

    async fn list_invitations_by_email(&self, email: &str) -> StorageResult<Vec<Invitation>> {
        let mut invitations: Vec<Invitation> = self
            .load()
            .await?
            .invitations
            .into_values()
            .filter(|invite| invite.email == email)
            .collect();
        invitations.sort_by_key(|invite| invite.invited_at);
        Ok(invitations)
    }

    async fn delete_invitations_by_email(&self, email: &str) -> StorageResult<()> {
        let mut document = self.load().await?;
        document.invitations.retain(|_, invite| invite.email != email);
        self.save(&document).await
    }
}
