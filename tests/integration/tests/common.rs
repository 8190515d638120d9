//! Common test fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use dir_core::{BootstrapAccount, DirectoryConfig};
use dir_lifecycle::Directory;
use dir_model::{Invitation, UserAccount};
use dir_store::{DirectoryStore, MemoryStore, StorageError, StorageResult};
use uuid::Uuid;

/// Test configuration with a fixed secret and one bootstrap admin.
pub fn test_config() -> DirectoryConfig {
    init_tracing();
    DirectoryConfig {
        hash_secret: "integration-test-secret".to_string(),
        bootstrap_accounts: vec![BootstrapAccount::new("ops@example.com", "Admin")],
        ..DirectoryConfig::default()
    }
}

/// A directory over a fresh in-memory store, plus the raw store handle.
pub fn directory() -> (Directory, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let directory = Directory::new(Arc::clone(&store) as _, test_config());
    (directory, store)
}

/// A six-digit code guaranteed to differ from the given one.
pub fn wrong_otp(code: &str) -> String {
    let n: u32 = code.parse().unwrap();
    format!("{:06}", (n + 1) % 1_000_000)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dir_lifecycle=debug,dir_store=debug")
        .try_init();
}

/// Backend whose every operation fails with a connection error, standing
/// in for an unreachable primary.
pub struct DownStore;

macro_rules! down {
    () => {
        Err(StorageError::Connection("primary unreachable".to_string()))
    };
}

#[async_trait]
impl DirectoryStore for DownStore {
    async fn get_account(&self, _email: &str) -> StorageResult<Option<UserAccount>> {
        down!()
    }

    async fn put_account(&self, _account: &UserAccount) -> StorageResult<()> {
        down!()
    }

    async fn delete_account(&self, _email: &str) -> StorageResult<()> {
        down!()
    }

    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>> {
        down!()
    }

    async fn get_invitation(&self, _id: Uuid) -> StorageResult<Option<Invitation>> {
        down!()
    }

    async fn find_invitation_by_token(&self, _token: &str) -> StorageResult<Option<Invitation>> {
        down!()
    }

    async fn put_invitation(&self, _invitation: &Invitation) -> StorageResult<()> {
        down!()
    }

    async fn list_invitations_by_email(&self, _email: &str) -> StorageResult<Vec<Invitation>> {
        down!()
    }

    async fn delete_invitations_by_email(&self, _email: &str) -> StorageResult<()> {
        down!()
    }
}
