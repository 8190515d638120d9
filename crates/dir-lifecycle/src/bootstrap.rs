//! Directory preparation: legacy seed pruning and bootstrap accounts.

use dir_crypto::{is_valid_email, mask_email, normalize_email};
use dir_model::UserAccount;
use dir_store::DirectoryStore;

use crate::directory::Directory;
use crate::error::LifecycleResult;

/// Outcome of a preparation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Legacy seed accounts removed.
    pub pruned: usize,
    /// Bootstrap accounts created.
    pub created: usize,
    /// Backends skipped because they were unavailable.
    pub skipped_backends: usize,
}

impl Directory {
    /// Runs the preparation pass against every configured backend: prunes
    /// the legacy seed accounts and creates missing bootstrap accounts.
    /// Bootstrap creation never overwrites an existing record.
    ///
    /// A backend that is down is skipped with a warning and will be
    /// prepared by a later pass; the pass itself still succeeds.
    ///
    /// ## Errors
    ///
    /// Infallible today beyond the `LifecycleResult` envelope; kept
    /// fallible so strict deployments can surface skipped backends.
    pub async fn prepare(&self) -> LifecycleResult<PrepareReport> {
        let mut report = PrepareReport::default();
        for target in &self.prepare_targets {
            match prepare_store(target.as_ref(), &self.config).await {
                Ok(partial) => {
                    report.pruned += partial.pruned;
                    report.created += partial.created;
                }
                Err(err) => {
                    report.skipped_backends += 1;
                    tracing::warn!(
                        error = %err,
                        "backend unavailable during preparation pass; skipping",
                    );
                }
            }
        }

        tracing::info!(
            pruned = report.pruned,
            created = report.created,
            skipped_backends = report.skipped_backends,
            "directory preparation pass complete",
        );
        Ok(report)
    }
}

/// Preparation pass against a single backend.
async fn prepare_store(
    store: &dyn DirectoryStore,
    config: &dir_core::DirectoryConfig,
) -> LifecycleResult<PrepareReport> {
    let mut report = PrepareReport::default();

    for seed in &config.legacy_seed_emails {
        let email = normalize_email(seed);
        if store.get_account(&email).await?.is_some() {
            store.delete_invitations_by_email(&email).await?;
            store.delete_account(&email).await?;
            report.pruned += 1;
        }
    }

    for bootstrap in &config.bootstrap_accounts {
        let email = normalize_email(&bootstrap.email);
        if !is_valid_email(&email) || !config.is_known_role(&bootstrap.role) {
            tracing::warn!(
                account = %mask_email(&email),
                "skipping malformed bootstrap account entry",
            );
            continue;
        }
        if store.get_account(&email).await?.is_none() {
            let account = UserAccount::new_bootstrap(&email, &bootstrap.role);
            store.put_account(&account).await?;
            report.created += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dir_core::{BootstrapAccount, DirectoryConfig};
    use dir_model::{AccountSource, AccountStatus};
    use dir_store::MemoryStore;

    use super::*;

    fn config_with_bootstrap() -> DirectoryConfig {
        DirectoryConfig {
            hash_secret: "test-secret".to_string(),
            bootstrap_accounts: vec![
                BootstrapAccount::new("Ops@Example.com", "Admin"),
                BootstrapAccount::new("hr@example.com", "HR"),
                BootstrapAccount::new("broken", "HR"),
            ],
            legacy_seed_emails: vec!["seed@example.com".to_string()],
            ..DirectoryConfig::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_missing_accounts_once() {
        let store = Arc::new(MemoryStore::new());
        let directory = Directory::new(Arc::clone(&store) as _, config_with_bootstrap());

        let report = directory.prepare().await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped_backends, 0);

        let account = store.get_account("ops@example.com").await.unwrap().unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.source, AccountSource::Bootstrap);

        // Second pass finds everything in place.
        let report = directory.prepare().await.unwrap();
        assert_eq!(report.created, 0);
    }

    #[tokio::test]
    async fn bootstrap_never_overwrites_existing_records() {
        let store = Arc::new(MemoryStore::new());
        let directory = Directory::new(Arc::clone(&store) as _, config_with_bootstrap());
        directory.prepare().await.unwrap();

        directory
            .set_role("ops@example.com", "Manager")
            .await
            .unwrap();

        directory.prepare().await.unwrap();
        let account = store.get_account("ops@example.com").await.unwrap().unwrap();
        assert_eq!(account.role, "Manager");
    }

    #[tokio::test]
    async fn legacy_seeds_are_pruned() {
        let store = Arc::new(MemoryStore::new());
        let seed = UserAccount::new_bootstrap("seed@example.com", "Admin");
        store.put_account(&seed).await.unwrap();

        let directory = Directory::new(Arc::clone(&store) as _, config_with_bootstrap());
        let report = directory.prepare().await.unwrap();

        assert_eq!(report.pruned, 1);
        assert!(store.get_account("seed@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn both_failover_backends_are_prepared() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        let directory = Directory::with_failover(
            Arc::clone(&primary) as _,
            Arc::clone(&fallback) as _,
            config_with_bootstrap(),
        );

        directory.prepare().await.unwrap();

        // The fallback was bootstrapped too, even with the primary healthy.
        assert!(primary.get_account("hr@example.com").await.unwrap().is_some());
        assert!(fallback.get_account("hr@example.com").await.unwrap().is_some());
    }
}
